//! Width/height pairs.

use serde::{Deserialize, Serialize};

/// A width/height pair, in metres.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Dims {
    /// The width (extent along x).
    pub width: f64,
    /// The height (extent along y).
    pub height: f64,
}

impl Dims {
    /// Creates a new [`Dims`].
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}
