//! Insulation requirements: system-level type and per-wire solid-insulation
//! requirements used by the coil advisor's pattern enumeration.

use serde::{Deserialize, Serialize};

/// The insulation system type required between isolation sides.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum InsulationType {
    /// Insulation required only for the circuit to function.
    Functional,
    /// A single layer of insulation adequate for operator protection.
    Basic,
    /// An additional, independent layer applied in conjunction with basic
    /// insulation.
    Supplementary,
    /// A single insulation system providing the protection of basic plus
    /// supplementary insulation.
    Reinforced,
    /// Two independent layers, each individually basic.
    Double,
}

/// Requirements for one winding's wire insulation, carried per pattern
/// combination in the coil advisor.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireSolidInsulationRequirements {
    /// Minimum magnet-wire coating grade (1, 2 or 3; ascending thickness).
    pub grade: u8,
    /// Minimum number of insulation layers the wire coating must provide.
    pub layers: u8,
    /// The breakdown voltage the wire's insulation must withstand.
    pub withstand_voltage: f64,
    /// Caps used to force margin-tape-compatible (thinner-coated) wires;
    /// `None` means no upper bound.
    pub max_grade: Option<u8>,
    /// See [`Self::max_grade`].
    pub max_layers: Option<u8>,
}

impl WireSolidInsulationRequirements {
    /// The all-functional requirement used when no insulation requirement
    /// is present: `FUNCTIONAL(grade 1, layers 1, V=0)`.
    pub fn functional() -> Self {
        Self { grade: 1, layers: 1, withstand_voltage: 0.0, max_grade: None, max_layers: None }
    }

    /// A reinforced requirement: `REINFORCED(grade 3 if FIW allowed, layers
    /// 3, V=withstand)`.
    pub fn reinforced(withstand_voltage: f64, allow_fully_insulated_wire: bool) -> Self {
        Self {
            grade: if allow_fully_insulated_wire { 3 } else { 2 },
            layers: 3,
            withstand_voltage,
            max_grade: None,
            max_layers: None,
        }
    }

    /// A basic-grade requirement at the given withstand voltage.
    pub fn basic(withstand_voltage: f64) -> Self {
        Self { grade: 1, layers: 1, withstand_voltage, max_grade: None, max_layers: None }
    }

    /// Returns a copy of `self` forced to be margin-tape-compatible: caps
    /// grade/layers at the functional minimum so the coil advisor can rely
    /// on a physical margin tape to carry the remaining withstand voltage.
    pub fn capped_for_margin_tape(mut self) -> Self {
        self.max_grade = Some(1);
        self.max_layers = Some(1);
        self
    }
}
