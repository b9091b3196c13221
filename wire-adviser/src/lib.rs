//! Per-winding wire selection: given a winding's functional description, a
//! section area and an insulation requirement, proposes and ranks wire
//! candidates by AC behaviour.

use diagnostics::{IssueSet, LogEntry};
use om_core::error::{Error, Result};
use om_core::insulation::WireSolidInsulationRequirements;
use om_core::settings::defaults;
use om_core::wire::Wire;

/// Per-filter weights applied before accumulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterWeights {
    pub area: f64,
    pub skin_effect: f64,
    pub effective_resistance: f64,
    pub proximity_effect: f64,
}

impl Default for FilterWeights {
    fn default() -> Self {
        Self { area: 1.0, skin_effect: 1.0, effective_resistance: 1.0, proximity_effect: 0.5 }
    }
}

/// The inputs needed to select a wire for one winding of one coil
/// combination.
#[derive(Debug, Clone)]
pub struct WireAdviserRequest<'a> {
    /// Candidate wires to choose among.
    pub wires: &'a [Wire],
    /// The outer area (width x height) available for this winding's section,
    /// in square metres.
    pub section_area: f64,
    /// The fraction of `section_area` that may actually be filled.
    pub fill_factor: f64,
    /// The number of series turns this winding requires.
    pub number_turns: u32,
    /// The number of sections (repetitions) this winding is split across.
    pub number_sections: u32,
    /// The effective frequency of the winding's current, in hertz.
    pub effective_frequency: f64,
    /// The winding's RMS current, in amperes.
    pub rms_current: f64,
    /// Operating temperature, in degrees Celsius.
    pub temperature: f64,
    /// The insulation requirement active for this winding in this
    /// combination.
    pub insulation_requirement: WireSolidInsulationRequirements,
    /// Maximum number of parallel strands to consider.
    pub max_parallels: u32,
    /// Maximum allowed RMS current density, in amperes per square metre.
    pub max_current_density: f64,
    /// Per-filter weights.
    pub weights: FilterWeights,
}

impl<'a> WireAdviserRequest<'a> {
    fn doubled_for_retry(&self, attempt: u32) -> Self {
        let factor = 2u32.pow(attempt);
        Self {
            max_current_density: self.max_current_density * factor as f64,
            max_parallels: self.max_parallels * factor,
            ..self.clone()
        }
    }
}

/// One candidate surviving every filter, with its AC-behaviour score.
#[derive(Debug, Clone)]
pub struct ScoredWireCandidate {
    pub wire: Wire,
    pub parallels: u32,
    pub maximum_outer_area_proportion: f64,
    pub score: f64,
}

struct Candidate<'a> {
    wire: &'a Wire,
    parallels: u32,
}

/// Selects and ranks wire candidates for one winding, retrying with relaxed
/// limits up to three more times (four attempts total) if no candidate
/// survives.
pub fn advise(
    request: &WireAdviserRequest<'_>,
    log: &mut IssueSet<LogEntry>,
) -> Result<Vec<ScoredWireCandidate>> {
    for attempt in 0..4 {
        let attempt_request = if attempt == 0 { request.clone() } else { request.doubled_for_retry(attempt) };
        let ranked = advise_once(&attempt_request)?;
        if !ranked.is_empty() {
            if attempt > 0 {
                log.add(LogEntry::info(format!(
                    "wire advisor: no survivors at nominal limits, succeeded after {attempt} retries"
                )));
            }
            return Ok(ranked);
        }
    }
    log.add(LogEntry::warning(
        "wire advisor: no wire candidate survived after 4 attempts",
        "wire-advisor",
    ));
    Ok(Vec::new())
}

fn advise_once(request: &WireAdviserRequest<'_>) -> Result<Vec<ScoredWireCandidate>> {
    let dataset = build_dataset(request);
    let dataset = filter_by_insulation(dataset, &request.insulation_requirement);
    let (dataset, area_proportions) = filter_by_area(dataset, request);
    if dataset.is_empty() {
        return Ok(Vec::new());
    }

    let area_scores: Vec<f64> = area_proportions.clone();
    let mut skin_raw = Vec::with_capacity(dataset.len());
    let mut resistance_raw = Vec::with_capacity(dataset.len());
    let mut proximity_raw = Vec::with_capacity(dataset.len());
    for candidate in &dataset {
        let behaviour = score_ac_behaviour(candidate, request)?;
        skin_raw.push(behaviour.skin_depth_penalty);
        resistance_raw.push(behaviour.effective_resistance_ratio);
        proximity_raw.push(behaviour.proximity_factor);
    }

    let normalised_area = scoring::normalise(&area_scores, false, false, request.weights.area);
    let normalised_skin = scoring::normalise(&skin_raw, false, true, request.weights.skin_effect);
    let normalised_resistance =
        scoring::normalise(&resistance_raw, false, true, request.weights.effective_resistance);
    let normalised_proximity =
        scoring::normalise(&proximity_raw, false, true, request.weights.proximity_effect);

    let totals = scoring::accumulate(
        &[normalised_area, normalised_skin, normalised_resistance, normalised_proximity],
        dataset.len(),
    );

    let scored: Vec<ScoredWireCandidate> = dataset
        .iter()
        .zip(area_proportions.iter())
        .zip(totals.iter())
        .map(|((candidate, &proportion), &score)| ScoredWireCandidate {
            wire: candidate.wire.clone(),
            parallels: candidate.parallels,
            maximum_outer_area_proportion: proportion,
            score,
        })
        .collect();

    Ok(scoring::rank(scored, &totals, totals.len()))
}

fn build_dataset<'a>(request: &WireAdviserRequest<'a>) -> Vec<Candidate<'a>> {
    let mut dataset = Vec::new();
    for wire in request.wires {
        for parallels in 1..=request.max_parallels {
            let footprint = wire.maximum_outer_width()
                * wire.maximum_outer_height()
                * parallels as f64
                * request.number_turns as f64
                / request.number_sections.max(1) as f64;
            if footprint > request.section_area * request.fill_factor {
                continue;
            }
            let current_density = request.rms_current / (parallels as f64 * wire.conducting_area());
            if current_density > request.max_current_density {
                continue;
            }
            dataset.push(Candidate { wire, parallels });
        }
    }
    dataset
}

fn filter_by_insulation<'a>(
    dataset: Vec<Candidate<'a>>,
    requirement: &WireSolidInsulationRequirements,
) -> Vec<Candidate<'a>> {
    dataset
        .into_iter()
        .filter(|candidate| {
            let grade = candidate.wire.grade();
            let layers = layers_for(candidate.wire);
            let withstand = breakdown_voltage_for(candidate.wire);

            grade >= requirement.grade
                && layers >= requirement.layers
                && withstand >= requirement.withstand_voltage
                && requirement.max_grade.map_or(true, |max| grade <= max)
                && requirement.max_layers.map_or(true, |max| layers <= max)
        })
        .collect()
}

fn layers_for(wire: &Wire) -> u8 {
    match wire.grade() {
        3 => 3,
        2 => 2,
        _ => 1,
    }
}

fn breakdown_voltage_for(wire: &Wire) -> f64 {
    // A coating's breakdown voltage scales with its thickness; this factor
    // is representative of enamelled-copper dielectric strength (kV/mm).
    const ENAMEL_DIELECTRIC_STRENGTH: f64 = 4.0e7;
    wire.coating_thickness() * ENAMEL_DIELECTRIC_STRENGTH
}

fn filter_by_area<'a>(
    dataset: Vec<Candidate<'a>>,
    request: &WireAdviserRequest<'a>,
) -> (Vec<Candidate<'a>>, Vec<f64>) {
    let mut survivors = Vec::new();
    let mut proportions = Vec::new();
    for candidate in dataset {
        let required_conducting_area = candidate.wire.conducting_area() * request.number_turns as f64
            / request.number_sections.max(1) as f64;
        let outer_footprint = candidate.wire.maximum_outer_width()
            * candidate.wire.maximum_outer_height()
            * request.number_turns as f64
            / request.number_sections.max(1) as f64;
        let available = request.section_area * request.fill_factor;
        if required_conducting_area <= available && outer_footprint <= available {
            proportions.push(outer_footprint / available);
            survivors.push(candidate);
        }
    }
    (survivors, proportions)
}

struct AcBehaviour {
    skin_depth_penalty: f64,
    effective_resistance_ratio: f64,
    proximity_factor: f64,
}

fn score_ac_behaviour(candidate: &Candidate<'_>, request: &WireAdviserRequest<'_>) -> Result<AcBehaviour> {
    const MU_0: f64 = 4.0 * std::f64::consts::PI * 1e-7;

    if request.effective_frequency <= 0.0 {
        return Ok(AcBehaviour {
            skin_depth_penalty: 1.0,
            effective_resistance_ratio: 1.0,
            proximity_factor: 1.0,
        });
    }

    let resistivity = candidate.wire.material.resistivity_at(request.temperature);
    let skin_depth = (resistivity / (std::f64::consts::PI * MU_0 * request.effective_frequency)).sqrt();
    let conducting_radius = candidate.wire.maximum_conducting_width() / 2.0;
    if skin_depth <= 0.0 {
        return Err(Error::InvalidInput("non-positive skin depth".into()));
    }
    let skin_depth_penalty = conducting_radius / skin_depth;

    // Dowell/Lotfi AC/DC resistance-ratio approximation for a round
    // conductor, parameterised by the normalised conductor diameter.
    let xi = std::f64::consts::SQRT_2 * conducting_radius / skin_depth;
    let dowell_factor = 1.0 + xi.powi(4) / (48.0 + 0.8 * xi.powi(4));

    let proximity_factor = 1.0 + (candidate.parallels as f64 - 1.0) * 0.1 * skin_depth_penalty;

    Ok(AcBehaviour {
        skin_depth_penalty,
        effective_resistance_ratio: dowell_factor,
        proximity_factor,
    })
}

/// The maximum current density allowed before the wire advisor's retry
/// budget is exercised, from the domain default.
pub const DEFAULT_MAX_CURRENT_DENSITY: f64 = defaults::MAXIMUM_EFFECTIVE_CURRENT_DENSITY;

#[cfg(test)]
mod tests {
    use om_core::wire::{ConductorMaterial, RoundWire, WireKind};

    use super::*;

    fn round_wire(name: &str, conducting_diameter: f64) -> Wire {
        Wire {
            name: name.into(),
            kind: WireKind::Round(RoundWire {
                conducting_diameter,
                outer_diameter: conducting_diameter + 0.00005,
                grade: 1,
            }),
            material: ConductorMaterial::COPPER,
            coating_relative_permittivity: 3.0,
        }
    }

    #[test]
    fn advise_returns_ranked_survivors() {
        let wires = vec![round_wire("thin", 0.0003), round_wire("thick", 0.0009)];
        let request = WireAdviserRequest {
            wires: &wires,
            section_area: 0.0001,
            fill_factor: 0.6,
            number_turns: 10,
            number_sections: 1,
            effective_frequency: 100_000.0,
            rms_current: 1.0,
            temperature: 25.0,
            insulation_requirement: WireSolidInsulationRequirements::functional(),
            max_parallels: 2,
            max_current_density: DEFAULT_MAX_CURRENT_DENSITY,
            weights: FilterWeights::default(),
        };
        let mut log: IssueSet<LogEntry> = IssueSet::new();
        let result = advise(&request, &mut log).unwrap();
        assert!(!result.is_empty());
        for pair in result.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn insulation_filter_rejects_under_graded_wire() {
        let wires = vec![round_wire("grade1", 0.0003)];
        let requirement = WireSolidInsulationRequirements::reinforced(3000.0, false);
        let request = WireAdviserRequest {
            wires: &wires,
            section_area: 0.0001,
            fill_factor: 0.6,
            number_turns: 10,
            number_sections: 1,
            effective_frequency: 100_000.0,
            rms_current: 1.0,
            temperature: 25.0,
            insulation_requirement: requirement,
            max_parallels: 2,
            max_current_density: DEFAULT_MAX_CURRENT_DENSITY,
            weights: FilterWeights::default(),
        };
        let mut log: IssueSet<LogEntry> = IssueSet::new();
        let result = advise(&request, &mut log).unwrap();
        assert!(result.is_empty());
    }
}
