//! Converter topologies and isolation sides.

use serde::{Deserialize, Serialize};

/// A converter topology.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Topology {
    /// Non-isolated step-down converter.
    Buck,
    /// Non-isolated step-up converter.
    Boost,
    /// Isolated single-primary, multi-secondary flyback converter.
    Flyback,
    /// Isolated buck-boost (isolated, bidirectional step up/down).
    IsolatedBuckBoost,
}

/// An ordinal-indexed galvanic-isolation equivalence class.
///
/// Windings sharing an [`IsolationSide`] are electrically referenced to the
/// same node set; ordinals below `3` have the conventional names
/// `PRIMARY`/`SECONDARY`/`TERTIARY`/`QUATERNARY`, but the enumeration is not
/// otherwise bounded (a converter may have arbitrarily many secondaries).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct IsolationSide(pub u16);

impl IsolationSide {
    /// The primary (ordinal 0) side.
    pub const PRIMARY: IsolationSide = IsolationSide(0);
    /// The secondary (ordinal 1) side.
    pub const SECONDARY: IsolationSide = IsolationSide(1);
    /// The tertiary (ordinal 2) side.
    pub const TERTIARY: IsolationSide = IsolationSide(2);
    /// The quaternary (ordinal 3) side.
    pub const QUATERNARY: IsolationSide = IsolationSide(3);

    /// Creates the isolation side with the given ordinal.
    pub const fn nth(ordinal: u16) -> Self {
        Self(ordinal)
    }

    /// The ordinal index of this isolation side.
    pub const fn ordinal(&self) -> u16 {
        self.0
    }
}
