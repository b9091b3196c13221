//! Design requirements: the immutable output of the converter synthesiser
//! and the input to the coil advisor.

use serde::{Deserialize, Serialize};

use crate::dim::DimWithTol;
use crate::insulation::InsulationType;
use crate::topology::{IsolationSide, Topology};

/// An insulation-system requirement attached to a set of [`DesignRequirements`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsulationRequirement {
    /// The required insulation system type.
    pub insulation_type: InsulationType,
    /// The withstand voltage the insulation system must sustain, when
    /// applicable to `insulation_type`.
    pub withstand_voltage: Option<f64>,
}

/// Requirements a coil design must satisfy, derived once by the converter
/// synthesiser and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignRequirements {
    /// Required magnetising inductance, in henries.
    pub magnetizing_inductance: DimWithTol,
    /// Turns ratios `N_1:N_i` for every secondary winding `i` (length `W-1`).
    pub turns_ratios: Vec<DimWithTol>,
    /// The isolation side of every winding (length `W`).
    pub isolation_sides: Vec<IsolationSide>,
    /// The insulation-system requirement, if any.
    pub insulation: Option<InsulationRequirement>,
    /// The converter topology these requirements were derived for.
    pub topology: Topology,
    /// Required leakage inductance, if bounded.
    pub leakage_inductance: Option<DimWithTol>,
}

impl DesignRequirements {
    /// The number of windings, `isolation_sides.len()`.
    pub fn number_of_windings(&self) -> usize {
        self.isolation_sides.len()
    }
}
