//! The coil-winding advisor: enumerates isolation-compatible section
//! patterns, repetitions and insulation combinations, chooses wire per
//! winding, winds the result, and ranks the surviving candidates
//!.

pub mod combination;
pub mod pattern;
pub mod winding;

use diagnostics::{IssueSet, LogEntry};
use geometry::prelude::Orientation;
use om_core::coil::{Coil, Winding};
use om_core::error::Result;
use om_core::magnetic::{Core, Magnetic};
use om_core::requirements::DesignRequirements;
use om_core::settings::Settings;
use om_core::wire::Wire;
use wire_adviser::{FilterWeights, WireAdviserRequest};

use crate::combination::{derive_insulation_combinations, drop_combinations_needing_margin, InsulationCombination};
use crate::pattern::{derive_patterns, derive_repetitions};
use crate::winding::{calculate_insulation, delimit_and_compact, section_proportions, tile_pattern, wind, wind_by_sections};

/// A margin (in metres) added around the tightest enclosing turns when
/// compacting sections after a successful wind.
const COMPACTION_MARGIN: f64 = 0.0003;

/// Everything the coil advisor needs to evaluate one core against a set of
/// design requirements and candidate wires.
pub struct CoilAdviserRequest<'a> {
    pub requirements: &'a DesignRequirements,
    pub number_turns_per_winding: &'a [u32],
    pub average_power_per_winding: &'a [f64],
    pub rms_current_per_winding: &'a [f64],
    pub effective_frequency_per_winding: &'a [f64],
    pub core: &'a Core,
    pub shape: &'a om_core::magnetic::CoreShape,
    pub is_toroidal: bool,
    pub wires: &'a [Wire],
    pub settings: &'a Settings,
    pub temperature: f64,
    pub max_results: usize,
}

/// One ranked, wound candidate.
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub magnetic: Magnetic,
    pub reference: String,
    pub score: f64,
}

/// Enumerates pattern x repetition x insulation combinations, attempts to
/// select wire and wind each, and returns the surviving candidates ranked
/// and truncated to `request.max_results`.
pub fn advise(request: &CoilAdviserRequest<'_>, log: &mut IssueSet<LogEntry>) -> Result<Vec<RankedCandidate>> {
    let orientation = if request.is_toroidal { Orientation::Contiguous } else { Orientation::Overlapping };
    let patterns = derive_patterns(&request.requirements.isolation_sides, request.is_toroidal);
    let repetitions = derive_repetitions(
        request.requirements.number_of_windings(),
        request.is_toroidal,
        request.requirements.leakage_inductance.is_some(),
    );

    let combo_slots = (patterns.len() * repetitions.len()).max(1);
    let per_combo_cap = request.max_results.div_ceil(combo_slots).max(1);

    let mut candidates = Vec::new();

    for pattern in &patterns {
        let mut combinations = derive_insulation_combinations(
            request.requirements,
            &request.requirements.isolation_sides,
            request.settings.coil_allow_margin_tape,
            request.settings.coil_allow_insulated_wire,
        );
        if !request.settings.coil_allow_margin_tape {
            combinations = drop_combinations_needing_margin(combinations, pattern);
        }
        combinations.truncate(per_combo_cap);

        for &repetition in &repetitions {
            let (tiled_pattern, effective_repetition) = expand_pattern(pattern, repetition, request.number_turns_per_winding);

            for combination in &combinations {
                match attempt_combination(
                    request,
                    orientation,
                    pattern,
                    repetition,
                    &tiled_pattern,
                    effective_repetition,
                    combination,
                    log,
                )? {
                    Some(candidate) => candidates.push(candidate),
                    None => continue,
                }
            }
        }
    }

    let scores: Vec<f64> = candidates.iter().map(|c| c.score).collect();
    Ok(scoring::rank(candidates, &scores, request.max_results))
}

fn expand_pattern(pattern: &pattern::Pattern, repetition: u32, physical_turns: &[u32]) -> (Vec<usize>, u32) {
    let (expanded, effective_repetition) = combination::check_integrity(pattern, repetition, physical_turns);
    if expanded.len() > pattern.len() {
        (expanded, effective_repetition)
    } else {
        (tile_pattern(&expanded, effective_repetition), effective_repetition)
    }
}

#[allow(clippy::too_many_arguments)]
fn attempt_combination(
    request: &CoilAdviserRequest<'_>,
    orientation: Orientation,
    pattern: &pattern::Pattern,
    repetition: u32,
    tiled_pattern: &[usize],
    effective_repetition: u32,
    combination: &InsulationCombination,
    log: &mut IssueSet<LogEntry>,
) -> Result<Option<RankedCandidate>> {
    let reference = format!(
        "pattern={pattern:?} repetition={repetition} effective_repetition={effective_repetition} combo={}",
        combination.tag
    );

    let proportions = section_proportions(tiled_pattern, request.average_power_per_winding);
    let mut geometry = wind_by_sections(request.shape, orientation, &proportions, tiled_pattern);
    calculate_insulation(&mut geometry, combination, orientation, request.settings.coil_allow_margin_tape);

    let number_of_windings = request.requirements.number_of_windings();
    let mut windings = Vec::with_capacity(number_of_windings);
    for winding_index in 0..number_of_windings {
        let assigned_sections: Vec<_> = geometry
            .section_order
            .iter()
            .filter(|id| {
                geometry.sections.get(**id).unwrap().winding_index
                    == Some(om_core::geometry_model::WindingIndex(winding_index as u16))
            })
            .copied()
            .collect();
        if assigned_sections.is_empty() {
            log.add(LogEntry::warning(
                "winding has no assigned section in this pattern/repetition",
                reference.clone(),
            ));
            return Ok(None);
        }
        let total_area: f64 = assigned_sections
            .iter()
            .map(|id| {
                let rect = geometry.sections.get(*id).unwrap().rect;
                rect.width() * rect.height()
            })
            .sum();
        let number_sections = assigned_sections.len() as u32;
        let section_area = total_area / number_sections as f64;

        let wire_request = WireAdviserRequest {
            wires: request.wires,
            section_area,
            fill_factor: 0.7,
            number_turns: request.number_turns_per_winding[winding_index],
            number_sections,
            effective_frequency: request.effective_frequency_per_winding[winding_index],
            rms_current: request.rms_current_per_winding[winding_index],
            temperature: request.temperature,
            insulation_requirement: combination.per_winding[winding_index],
            max_parallels: om_core::settings::defaults::MAXIMUM_NUMBER_PARALLELS,
            max_current_density: om_core::settings::defaults::MAXIMUM_EFFECTIVE_CURRENT_DENSITY,
            weights: FilterWeights::default(),
        };
        let ranked_wires = wire_adviser::advise(&wire_request, log)?;
        let Some(best) = ranked_wires.into_iter().next() else {
            log.add(LogEntry::warning("no wire survived for winding", format!("{reference} winding={winding_index}")));
            return Ok(None);
        };

        windings.push(Winding {
            name: format!("winding {winding_index}").into(),
            isolation_side: request.requirements.isolation_sides[winding_index],
            number_turns: request.number_turns_per_winding[winding_index],
            number_parallels: best.parallels,
            wire: best.wire,
            insulation_requirement: combination.per_winding[winding_index],
        });
    }

    if !wind(&mut geometry, &windings, orientation) {
        log.add(LogEntry::warning("winding failed to fit in window", reference.clone()));
        return Ok(None);
    }
    delimit_and_compact(&mut geometry, COMPACTION_MARGIN);

    let score = windings.len() as f64;
    Ok(Some(RankedCandidate {
        magnetic: Magnetic {
            core: request.core.clone(),
            coil: Coil { windings, geometry: Some(geometry) },
            manufacturer_info: None,
        },
        reference,
        score,
    }))
}
