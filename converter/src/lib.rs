//! Converter operating-point synthesis (C3): per-topology duty-cycle and
//! inductance derivation, and the analytical voltage/current waveforms each
//! topology's switching action produces.

pub mod boost;
pub mod buck;
pub mod checks;
pub mod common;
pub mod flyback;
pub mod isolated_buck_boost;

pub use checks::TopologyChecks;

use om_core::dim::DimWithTol;
use om_core::error::Result;
use om_core::geometry_model::WindingIndex;
use om_core::inductance_model::InductanceModel;
use om_core::magnetic::{CoreMaterial, CoreShape, Magnetic};
use om_core::requirements::DesignRequirements;
use waveform::OperatingPoint;

/// Implemented once per topology: derives the coil's design requirements,
/// then synthesises the per-corner operating points given a turns ratio
/// and magnetising inductance.
pub trait Converter {
    /// Derives the coil design requirements implied by this converter's
    /// request (magnetising inductance bound, turns ratios, isolation
    /// sides, insulation requirement).
    fn process_design_requirements(&self) -> Result<DesignRequirements>;

    /// Synthesises one [`OperatingPoint`] per input-voltage corner present
    /// times per topology-specific operating point requested, given an
    /// already-known turns ratio and magnetising inductance.
    fn process_operating_points(
        &self,
        turns_ratios: &[DimWithTol],
        magnetizing_inductance: &DimWithTol,
    ) -> Result<Vec<OperatingPoint>>;

    /// As [`Self::process_operating_points`], but resolving the turns
    /// ratios and magnetising inductance from an already-wound
    /// [`Magnetic`] via `inductance_model`.
    fn process_operating_points_from_magnetic(
        &self,
        shape: &CoreShape,
        material: &CoreMaterial,
        magnetic: &Magnetic,
        inductance_model: &dyn InductanceModel,
    ) -> Result<Vec<OperatingPoint>> {
        let requirements = self.process_design_requirements()?;
        let inductance = inductance_model
            .calculate_inductance_from_number_turns_and_gapping(
                shape,
                material,
                &magnetic.core,
                &magnetic.coil,
                WindingIndex(0),
            )?
            .magnetizing_inductance;
        self.process_operating_points(&requirements.turns_ratios, &inductance)
    }
}
