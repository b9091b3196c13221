//! The magnetising-inductance model adapter: an external collaborator,
//! given a default reluctance-based implementation here so that the coil
//! advisor is runnable without a caller-supplied model.

use serde::{Deserialize, Serialize};

use crate::coil::Coil;
use crate::dim::DimWithTol;
use crate::error::{Error, Result};
use crate::geometry_model::WindingIndex;
use crate::magnetic::{Core, CoreMaterial, CoreShape};

const MU_0: f64 = 4.0 * std::f64::consts::PI * 1e-7;

/// The result of evaluating a core/coil pair's magnetising inductance.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct InductanceResult {
    /// The magnetising inductance seen from the reference winding.
    pub magnetizing_inductance: DimWithTol,
    /// The total magnetic reluctance of the core's flux path, in
    /// ampere-turns per weber.
    pub reluctance: f64,
    /// The fringing-flux correction factor applied around gaps (>= 1.0).
    pub fringing_factor: f64,
}

/// Computes magnetising inductance from a core's geometry/gapping and a
/// coil's turns count.
///
/// The core uses only [`DimWithTol::get_nominal`] of the returned
/// inductance; `reluctance` and `fringing_factor` are reported for
/// diagnostics and are not otherwise consumed.
pub trait InductanceModel {
    fn calculate_inductance_from_number_turns_and_gapping(
        &self,
        shape: &CoreShape,
        material: &CoreMaterial,
        core: &Core,
        coil: &Coil,
        reference_winding: WindingIndex,
    ) -> Result<InductanceResult>;
}

/// A gapped-core reluctance model: `L = N² / reluctance`, with the core's
/// ungapped reluctance combined in series with each gap's reluctance and a
/// simple fringing-factor correction applied to gaps wider than 5% of the
/// core's effective length.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReluctanceInductanceModel;

impl InductanceModel for ReluctanceInductanceModel {
    fn calculate_inductance_from_number_turns_and_gapping(
        &self,
        shape: &CoreShape,
        material: &CoreMaterial,
        core: &Core,
        coil: &Coil,
        reference_winding: WindingIndex,
    ) -> Result<InductanceResult> {
        let winding = coil.winding(reference_winding).ok_or_else(|| {
            Error::InvalidInput(format!(
                "reference winding {:?} not present on coil",
                reference_winding
            ))
        })?;
        let number_turns = f64::from(winding.number_turns);

        let gap_length = core.total_gap_length();
        let fringing_factor = if gap_length > 0.05 * shape.effective_length {
            1.0 + (gap_length / shape.effective_area.sqrt()) * (2.0_f64).ln()
        } else {
            1.0
        };

        let core_reluctance = shape.effective_length
            / (MU_0 * material.initial_permeability * shape.effective_area * core.number_stacks as f64);
        let gap_reluctance = if gap_length > 0.0 {
            gap_length / (MU_0 * fringing_factor * shape.effective_area * core.number_stacks as f64)
        } else {
            0.0
        };
        let reluctance = core_reluctance + gap_reluctance;

        if reluctance <= 0.0 {
            return Err(Error::InvalidInput("non-positive reluctance".into()));
        }

        let inductance = number_turns * number_turns / reluctance;
        Ok(InductanceResult {
            magnetizing_inductance: DimWithTol::from_nominal(inductance),
            reluctance,
            fringing_factor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coil::Winding;
    use crate::insulation::WireSolidInsulationRequirements;
    use crate::magnetic::{CoreShapeFamily, Gap, GapType};
    use crate::topology::IsolationSide;
    use crate::wire::{ConductorMaterial, RoundWire, Wire, WireKind};

    fn sample_shape() -> CoreShape {
        CoreShape {
            name: "ETD 34".into(),
            family: CoreShapeFamily::E,
            effective_area: 97.1e-6,
            effective_length: 78.6e-3,
            effective_volume: 7640e-9,
            window_width: 10e-3,
            window_height: 20e-3,
        }
    }

    fn sample_material() -> CoreMaterial {
        CoreMaterial {
            name: "3C97".into(),
            initial_permeability: 3000.0,
            saturation_flux_density: 0.41,
            curie_temperature: 220.0,
            steinmetz: (1.0, 1.5, 2.5),
        }
    }

    fn sample_coil() -> Coil {
        let wire = Wire {
            name: "sample".into(),
            kind: WireKind::Round(RoundWire {
                conducting_diameter: 0.0005,
                outer_diameter: 0.00055,
                grade: 1,
            }),
            material: ConductorMaterial::COPPER,
            coating_relative_permittivity: 3.0,
        };
        Coil::new(vec![Winding {
            name: "primary".into(),
            isolation_side: IsolationSide::PRIMARY,
            number_turns: 20,
            number_parallels: 1,
            wire,
            insulation_requirement: WireSolidInsulationRequirements::functional(),
        }])
    }

    #[test]
    fn gapped_core_has_lower_inductance_than_ungapped() {
        let model = ReluctanceInductanceModel;
        let shape = sample_shape();
        let material = sample_material();
        let coil = sample_coil();

        let ungapped = Core {
            shape: shape.name.clone(),
            material: material.name.clone(),
            gapping: vec![],
            number_stacks: 1,
        };
        let gapped = Core {
            gapping: vec![Gap { gap_type: GapType::Ground, length: 0.001 }],
            ..ungapped.clone()
        };

        let l_ungapped = model
            .calculate_inductance_from_number_turns_and_gapping(
                &shape,
                &material,
                &ungapped,
                &coil,
                WindingIndex(0),
            )
            .unwrap()
            .magnetizing_inductance
            .get_nominal();
        let l_gapped = model
            .calculate_inductance_from_number_turns_and_gapping(
                &shape,
                &material,
                &gapped,
                &coil,
                WindingIndex(0),
            )
            .unwrap()
            .magnetizing_inductance
            .get_nominal();

        assert!(l_gapped < l_ungapped);
    }

    #[test]
    fn missing_winding_is_an_error() {
        let model = ReluctanceInductanceModel;
        let shape = sample_shape();
        let material = sample_material();
        let coil = sample_coil();
        let core = Core {
            shape: shape.name.clone(),
            material: material.name.clone(),
            gapping: vec![],
            number_stacks: 1,
        };
        assert!(model
            .calculate_inductance_from_number_turns_and_gapping(
                &shape,
                &material,
                &core,
                &coil,
                WindingIndex(1),
            )
            .is_err());
    }
}
