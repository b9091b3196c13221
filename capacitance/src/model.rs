//! Static capacitance between two turns.
//!
//! The four round-wire models are direct transcriptions of Massarini
//! (1998), Duerdoth, Albach's inductor-design chapter and Koch, as they
//! appear in the cited stray-capacitance implementation; none of them are
//! derived from first principles here.

use geometry::prelude::Orientation;
use om_core::error::{Error, Result};
use om_core::wire::{Wire, WireKind};

use crate::insulation::{layers_between_two_turns, InsulationLayer};
use crate::turn::{TurnFootprint, WindingWindowShape};
use crate::VACUUM_PERMITTIVITY;

/// Which closed-form round-wire capacitance model to evaluate.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RoundWireModel {
    Koch,
    Albach,
    Duerdoth,
    Massarini,
}

/// The series-capacitance effective relative permittivity of two stacked
/// dielectrics, `ε_eff = ε₁·ε₂·(t₁+t₂) / (t₁·ε₂ + t₂·ε₁)`.
pub fn effective_relative_permittivity(
    first_thickness: f64,
    first_relative_permittivity: f64,
    second_thickness: f64,
    second_relative_permittivity: f64,
) -> f64 {
    first_relative_permittivity * second_relative_permittivity * (first_thickness + second_thickness)
        / (first_thickness * second_relative_permittivity + second_thickness * first_relative_permittivity)
}

/// The preprocessed inputs every round-wire model is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundWirePreprocessed {
    pub coating_thickness: f64,
    pub average_turn_length: f64,
    pub conducting_radius: f64,
    pub distance_through_layers: f64,
    pub distance_through_air: f64,
    pub coating_relative_permittivity: f64,
    pub layers_effective_relative_permittivity: f64,
}

/// Rounds `value` to 6 decimal places, matching the original
/// implementation's `roundFloat(distanceBetweenTurns, 6)`, which absorbs
/// floating-point placement noise before the negative-distance clamp below.
fn round_6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Preprocesses two round-wire turns into the shared inputs every
/// closed-form model consumes.
pub fn preprocess_round_wires(
    first: &TurnFootprint,
    first_wire: &Wire,
    second: &TurnFootprint,
    second_wire: &Wire,
    orientation: Orientation,
    shape: WindingWindowShape,
    insulation_layers: &[InsulationLayer],
) -> RoundWirePreprocessed {
    let coating_thickness = (first_wire.coating_thickness() + second_wire.coating_thickness()) / 2.0;
    let coating_relative_permittivity =
        (first_wire.coating_relative_permittivity + second_wire.coating_relative_permittivity) / 2.0;
    let conducting_radius =
        (first_wire.maximum_conducting_width() + second_wire.maximum_conducting_width()) / 2.0;

    let mut distance_between_turns = first.coordinates.distance(&second.coordinates)
        - (first_wire.maximum_outer_width() / 2.0 + second_wire.maximum_outer_width() / 2.0);
    distance_between_turns = round_6(distance_between_turns);

    let between = layers_between_two_turns(first, second, orientation, shape, insulation_layers);
    let mut distance_through_layers = 0.0;
    let mut effective_permittivity = 1.0;
    for (index, layer) in between.iter().enumerate() {
        if index == 0 {
            effective_permittivity = layer.relative_permittivity;
        } else {
            let previous = between[index - 1];
            effective_permittivity = effective_relative_permittivity(
                previous.thickness,
                effective_permittivity,
                layer.thickness,
                layer.relative_permittivity,
            );
        }
        distance_through_layers += layer.thickness;
    }

    let mut distance_through_air = distance_between_turns - distance_through_layers;
    let mut distance_through_layers = distance_through_layers;
    if distance_between_turns < 0.0 {
        // Non-adjacent turns: push the air gap out to the sentinel alone so
        // `distance_through_air + distance_through_layers` stays finite
        // (summing two `f64::MAX`s would overflow to infinity and poison
        // every downstream model with NaN).
        distance_through_air = f64::MAX;
        distance_through_layers = 0.0;
    }

    let average_turn_length = (first.length + second.length) / 2.0;

    RoundWirePreprocessed {
        coating_thickness,
        average_turn_length,
        conducting_radius,
        distance_through_layers,
        distance_through_air,
        coating_relative_permittivity,
        layers_effective_relative_permittivity: effective_permittivity,
    }
}

/// Massarini's (1998) closed-form static capacitance between two round
/// turns.
pub fn massarini(inputs: &RoundWirePreprocessed) -> f64 {
    let conducting_diameter = inputs.conducting_radius * 2.0;
    let (outer_diameter, epsilon_r) = if inputs.coating_thickness > 0.0 {
        (
            (inputs.conducting_radius + inputs.coating_thickness) * 2.0,
            effective_relative_permittivity(
                inputs.coating_thickness,
                inputs.coating_relative_permittivity,
                inputs.distance_through_air + inputs.distance_through_layers,
                inputs.layers_effective_relative_permittivity,
            ),
        )
    } else {
        (
            (inputs.conducting_radius + inputs.distance_through_air / 2.0) * 2.0,
            effective_relative_permittivity(
                inputs.distance_through_air / 2.0,
                VACUUM_PERMITTIVITY,
                inputs.distance_through_air + inputs.distance_through_layers,
                inputs.layers_effective_relative_permittivity,
            ),
        )
    };

    let log_ratio = (outer_diameter / conducting_diameter).ln();
    let aux0 = 2.0 * epsilon_r + log_ratio;
    let aux1 = (log_ratio * (2.0 * epsilon_r + log_ratio)).sqrt();
    let aux2 = (2.0 * epsilon_r * log_ratio + log_ratio.powi(2)).sqrt();
    let sqrt3 = 3.0_f64.sqrt();

    VACUUM_PERMITTIVITY * inputs.average_turn_length * 2.0 * epsilon_r
        * (((-1.0 + sqrt3) * aux0) / ((1.0 + sqrt3) * aux1)).atan()
        / aux2
}

/// Duerdoth's closed-form static capacitance between two round turns.
pub fn duerdoth(inputs: &RoundWirePreprocessed) -> f64 {
    let h = inputs.distance_through_air + inputs.distance_through_layers;
    let delta = inputs.coating_thickness;
    let r0 = inputs.conducting_radius;
    let dtt = 2.0 * r0 + 2.0 * delta;
    let d_prima = 2.0 * (r0 + delta) + h;
    let d_eff = d_prima - 0.15 * 2.0 * (r0 + delta) + 0.26 * dtt;
    let epsilon_eff = effective_relative_permittivity(
        delta,
        inputs.coating_relative_permittivity,
        h,
        inputs.layers_effective_relative_permittivity,
    );

    VACUUM_PERMITTIVITY * epsilon_eff * inputs.average_turn_length * 2.0 * r0 / d_eff
}

/// Albach's closed-form static capacitance between two round turns.
pub fn albach(inputs: &RoundWirePreprocessed) -> f64 {
    let distance_through_layers_and_air = inputs.distance_through_air + inputs.distance_through_layers;
    let effective_relative_permittivity_value = if inputs.distance_through_air > 0.0 && inputs.distance_through_layers > 0.0
    {
        effective_relative_permittivity(
            inputs.distance_through_layers,
            inputs.layers_effective_relative_permittivity,
            inputs.distance_through_air,
            1.0,
        )
    } else if inputs.distance_through_air > 0.0 && inputs.distance_through_layers == 0.0 {
        1.0
    } else {
        inputs.layers_effective_relative_permittivity
    };

    let zeta =
        1.0 - inputs.coating_thickness / (inputs.coating_relative_permittivity * (inputs.conducting_radius + inputs.coating_thickness));
    let beta = 1.0 / zeta
        * (1.0
            + distance_through_layers_and_air
                / (2.0 * effective_relative_permittivity_value * (inputs.conducting_radius + inputs.coating_thickness)));
    let v = beta / (beta.powi(2) - 1.0).sqrt() * ((beta + 1.0) / (beta - 1.0)).sqrt().atan();
    let z = 1.0 / (beta.powi(2) - 1.0) * ((beta.powi(2) - 2.0) * v - beta / 2.0) - std::f64::consts::PI / 4.0;
    let y1 = 1.0 / zeta
        * (v - std::f64::consts::PI / 4.0
            + 1.0 / (2.0 * inputs.coating_relative_permittivity)
                * (inputs.distance_through_layers / (inputs.conducting_radius + inputs.coating_thickness)).powi(2)
                * z
                / zeta);

    2.0 / 3.0 * VACUUM_PERMITTIVITY * inputs.average_turn_length * y1
}

/// Koch's closed-form static capacitance between two round turns.
pub fn koch(inputs: &RoundWirePreprocessed) -> f64 {
    let alpha = 1.0 - inputs.coating_thickness / (inputs.coating_relative_permittivity * inputs.conducting_radius);
    let beta = if inputs.distance_through_layers > 0.0 {
        1.0 / alpha
            * (1.0
                + inputs.distance_through_layers
                    / (2.0 * inputs.layers_effective_relative_permittivity * inputs.conducting_radius))
    } else {
        1.0 / alpha * (1.0 + inputs.distance_through_air / (2.0 * VACUUM_PERMITTIVITY * inputs.conducting_radius))
    };

    let atan_term = ((beta + 1.0) / (beta - 1.0)).sqrt().atan();
    let v = beta / (beta.powi(2) - 1.0).sqrt() * atan_term - std::f64::consts::PI / 4.0;
    let z = beta * (beta.powi(2) - 2.0) / (beta.powi(2) - 1.0).powf(1.5) * atan_term
        - beta / (2.0 * (beta.powi(2) - 1.0))
        - std::f64::consts::PI / 4.0;

    let one_minus_alpha_term = 1.0 - inputs.coating_thickness / (inputs.coating_relative_permittivity * inputs.conducting_radius);
    VACUUM_PERMITTIVITY * inputs.average_turn_length / one_minus_alpha_term
        * (v + 1.0 / (8.0 * inputs.coating_relative_permittivity)
            * (2.0 * inputs.coating_thickness / inputs.conducting_radius).powi(2)
            * z
            / one_minus_alpha_term)
}

/// Evaluates `model` against `inputs`.
pub fn calculate_round_wire_capacitance(model: RoundWireModel, inputs: &RoundWirePreprocessed) -> f64 {
    match model {
        RoundWireModel::Koch => koch(inputs),
        RoundWireModel::Albach => albach(inputs),
        RoundWireModel::Duerdoth => duerdoth(inputs),
        RoundWireModel::Massarini => massarini(inputs),
    }
}

/// The parallel-plate static capacitance between two `PLANAR` turns:
/// `C = ε₀·ε_r·overlap·l_avg / d_layers`.
pub fn parallel_plate(
    first: &TurnFootprint,
    first_wire: &Wire,
    second: &TurnFootprint,
    second_wire: &Wire,
    distance_through_layers: f64,
    relative_permittivity: f64,
) -> f64 {
    let overlap = if first.coordinates.y == second.coordinates.y {
        (first_wire.maximum_conducting_height() + second_wire.maximum_conducting_height()) / 2.0
    } else {
        let first_left = first.coordinates.x - first.dims.width / 2.0;
        let first_right = first.coordinates.x + first.dims.width / 2.0;
        let second_left = second.coordinates.x - second.dims.width / 2.0;
        let second_right = second.coordinates.x + second.dims.width / 2.0;
        (first_right.min(second_right) - first_left.max(second_left)).abs()
    };
    let average_turn_length = (first.length + second.length) / 2.0;

    VACUUM_PERMITTIVITY * relative_permittivity * overlap * average_turn_length / distance_through_layers
}

/// Dispatches on the two turns' wire kinds: planar turns use the
/// parallel-plate model at `pcb_relative_permittivity`; round turns use
/// `model`. Any other wire kind has no capacitance model defined.
#[allow(clippy::too_many_arguments)]
pub fn calculate_static_capacitance_between_two_turns(
    first: &TurnFootprint,
    first_wire: &Wire,
    second: &TurnFootprint,
    second_wire: &Wire,
    model: RoundWireModel,
    orientation: Orientation,
    shape: WindingWindowShape,
    insulation_layers: &[InsulationLayer],
    pcb_relative_permittivity: f64,
) -> Result<f64> {
    match (&first_wire.kind, &second_wire.kind) {
        (WireKind::Planar(_), WireKind::Planar(_)) => {
            let between = layers_between_two_turns(first, second, orientation, shape, insulation_layers);
            let distance_through_layers: f64 = between.iter().map(|layer| layer.thickness).sum();
            Ok(parallel_plate(first, first_wire, second, second_wire, distance_through_layers, pcb_relative_permittivity))
        }
        (WireKind::Round(_), WireKind::Round(_)) => {
            let inputs =
                preprocess_round_wires(first, first_wire, second, second_wire, orientation, shape, insulation_layers);
            Ok(calculate_round_wire_capacitance(model, &inputs))
        }
        _ => Err(Error::Unknown(format!(
            "no stray-capacitance model for wire kinds {:?}/{:?}",
            first_wire.kind, second_wire.kind
        ))),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn sample_inputs() -> RoundWirePreprocessed {
        RoundWirePreprocessed {
            coating_thickness: 0.00002,
            average_turn_length: 0.05,
            conducting_radius: 0.0002,
            distance_through_layers: 0.0,
            distance_through_air: 0.00001,
            coating_relative_permittivity: 3.0,
            layers_effective_relative_permittivity: 1.0,
        }
    }

    #[test]
    fn effective_permittivity_of_equal_layers_is_itself() {
        assert_relative_eq!(effective_relative_permittivity(1.0, 4.0, 1.0, 4.0), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn every_round_model_returns_a_positive_finite_capacitance() {
        let inputs = sample_inputs();
        for model in [RoundWireModel::Koch, RoundWireModel::Albach, RoundWireModel::Duerdoth, RoundWireModel::Massarini] {
            let c = calculate_round_wire_capacitance(model, &inputs);
            assert!(c.is_finite() && c > 0.0, "{model:?} returned {c}");
        }
    }

    #[test]
    fn round_6_absorbs_float_noise() {
        assert_eq!(round_6(0.123_456_789), 0.123457);
    }

    #[test]
    fn negative_distance_between_turns_yields_finite_non_negative_capacitance() {
        use geometry::prelude::{Dims, Point};
        use om_core::wire::{ConductorMaterial, RoundWire, WireKind};

        let wire = Wire {
            name: "overlapping".into(),
            kind: WireKind::Round(RoundWire { conducting_diameter: 0.001, outer_diameter: 0.0012, grade: 1 }),
            material: ConductorMaterial::COPPER,
            coating_relative_permittivity: 3.0,
        };
        // The two turns' centres are closer together than their combined
        // outer radii, so the raw distance-between-turns is negative.
        let first = TurnFootprint {
            name: "a".into(),
            coordinates: Point::new(0.0, 0.0),
            dims: Dims::new(0.0012, 0.0012),
            winding_index: om_core::geometry_model::WindingIndex(0),
            parallel_index: 0,
            length: 0.05,
        };
        let second = TurnFootprint {
            name: "b".into(),
            coordinates: Point::new(0.0005, 0.0),
            dims: Dims::new(0.0012, 0.0012),
            winding_index: om_core::geometry_model::WindingIndex(0),
            parallel_index: 0,
            length: 0.05,
        };

        for model in [RoundWireModel::Koch, RoundWireModel::Albach, RoundWireModel::Duerdoth, RoundWireModel::Massarini] {
            let c = calculate_static_capacitance_between_two_turns(
                &first,
                &wire,
                &second,
                &wire,
                model,
                Orientation::Overlapping,
                WindingWindowShape::Rectangular,
                &[],
                4.0,
            )
            .unwrap();
            assert!(c.is_finite() && c >= 0.0, "{model:?} returned {c}");
        }
    }
}
