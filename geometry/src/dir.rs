//! Axis and winding-orientation enumerations.

use serde::{Deserialize, Serialize};

/// A cartesian axis.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Dir {
    /// The horizontal (x) axis.
    Horiz,
    /// The vertical (y) axis.
    Vert,
}

impl Dir {
    /// Returns the other axis.
    pub const fn other(&self) -> Dir {
        match self {
            Dir::Horiz => Dir::Vert,
            Dir::Vert => Dir::Horiz,
        }
    }
}

/// The orientation along which sections of a winding window are divided.
///
/// `Overlapping` sections are stacked radially outward from the bobbin
/// column, as in a concentric (non-toroidal) core. `Contiguous` sections
/// are arranged angularly around the window, as on a toroid, where sections
/// cannot overlap radially and instead must tile the circumference.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Concentric winding: sections stack outward from the bobbin column.
    Overlapping,
    /// Toroidal winding: sections tile the angular circumference.
    Contiguous,
}
