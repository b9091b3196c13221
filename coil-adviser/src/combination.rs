//! Insulation-combination enumeration, margin-tape necessity and
//! pattern/repetition integrity checking.

use om_core::insulation::{InsulationType, WireSolidInsulationRequirements};
use om_core::requirements::DesignRequirements;
use om_core::topology::IsolationSide;

use crate::pattern::Pattern;

/// One admissible assignment of per-winding insulation requirements.
#[derive(Debug, Clone, PartialEq)]
pub struct InsulationCombination {
    /// Requirement for each winding, indexed by winding index.
    pub per_winding: Vec<WireSolidInsulationRequirements>,
    /// Human-readable tag identifying which rule produced this
    /// combination (used in the candidate's reference string).
    pub tag: String,
}

/// Enumerates admissible insulation combinations for a design requirement.
pub fn derive_insulation_combinations(
    requirements: &DesignRequirements,
    isolation_sides: &[IsolationSide],
    allow_margin_tape: bool,
    allow_fully_insulated_wire: bool,
) -> Vec<InsulationCombination> {
    let number_of_windings = isolation_sides.len();

    let Some(insulation) = &requirements.insulation else {
        return vec![InsulationCombination {
            per_winding: vec![WireSolidInsulationRequirements::functional(); number_of_windings],
            tag: "functional".to_string(),
        }];
    };

    let withstand = insulation.withstand_voltage.unwrap_or(0.0);

    let mut distinct_sides: Vec<IsolationSide> = Vec::new();
    for side in isolation_sides {
        if !distinct_sides.contains(side) {
            distinct_sides.push(*side);
        }
    }

    let reinforced_excluding = |excluded: IsolationSide| -> InsulationCombination {
        InsulationCombination {
            per_winding: isolation_sides
                .iter()
                .map(|side| {
                    if *side == excluded {
                        WireSolidInsulationRequirements::functional()
                    } else {
                        WireSolidInsulationRequirements::reinforced(withstand, allow_fully_insulated_wire)
                    }
                })
                .collect(),
            tag: format!("reinforced-excluding-{}", excluded.ordinal()),
        }
    };

    let basic_excluding = |excluded: IsolationSide| -> InsulationCombination {
        InsulationCombination {
            per_winding: isolation_sides
                .iter()
                .map(|side| {
                    if *side == excluded {
                        WireSolidInsulationRequirements::functional()
                    } else {
                        WireSolidInsulationRequirements::basic(withstand)
                    }
                })
                .collect(),
            tag: format!("basic-excluding-{}", excluded.ordinal()),
        }
    };

    let mut combinations = match insulation.insulation_type {
        InsulationType::Reinforced | InsulationType::Double if allow_margin_tape => {
            let mut combos: Vec<InsulationCombination> =
                distinct_sides.iter().map(|&side| reinforced_excluding(side)).collect();
            if insulation.insulation_type == InsulationType::Double {
                combos.push(InsulationCombination {
                    per_winding: vec![
                        WireSolidInsulationRequirements::basic(withstand);
                        number_of_windings
                    ],
                    tag: "double-all-basic".to_string(),
                });
            }
            combos
        }
        InsulationType::Reinforced | InsulationType::Double => {
            // Margin tape disallowed: fall back to an all-reinforced
            // combination with no excluded side.
            vec![InsulationCombination {
                per_winding: vec![
                    WireSolidInsulationRequirements::reinforced(withstand, allow_fully_insulated_wire);
                    number_of_windings
                ],
                tag: "reinforced-no-margin".to_string(),
            }]
        }
        InsulationType::Basic | InsulationType::Supplementary if !allow_margin_tape => {
            // Upgraded to DOUBLE semantics.
            vec![InsulationCombination {
                per_winding: vec![
                    WireSolidInsulationRequirements::basic(withstand);
                    number_of_windings
                ],
                tag: "basic-upgraded-to-double".to_string(),
            }]
        }
        InsulationType::Basic | InsulationType::Supplementary => {
            let mut combos = vec![InsulationCombination {
                per_winding: vec![
                    WireSolidInsulationRequirements::functional().capped_for_margin_tape();
                    number_of_windings
                ],
                tag: "functional-with-margin".to_string(),
            }];
            combos.extend(distinct_sides.iter().map(|&side| basic_excluding(side)));
            combos
        }
        InsulationType::Functional => {
            vec![InsulationCombination {
                per_winding: vec![WireSolidInsulationRequirements::functional(); number_of_windings],
                tag: "functional".to_string(),
            }]
        }
    };

    combinations
}

/// Drops combinations that [`needs_margin`] flags as requiring a physical
/// margin tape for the given `pattern`, used when margin tape is globally
/// disallowed.
pub fn drop_combinations_needing_margin(
    combinations: Vec<InsulationCombination>,
    pattern: &Pattern,
) -> Vec<InsulationCombination> {
    combinations.into_iter().filter(|combination| !needs_margin(combination, pattern)).collect()
}

fn needs_margin_for_adjacent_pair(
    a: &WireSolidInsulationRequirements,
    b: &WireSolidInsulationRequirements,
) -> bool {
    let grades_sum = a.grade + b.grade;
    let layers_sum = a.layers + b.layers;
    layers_sum < 3 && grades_sum < 4
}

/// Returns `true` if any two windings adjacent in the cyclic pattern (the
/// pattern wraps, since a repeated pattern tiles around the winding
/// window) need a physical margin tape between them.
pub fn needs_margin(combination: &InsulationCombination, pattern: &Pattern) -> bool {
    if pattern.len() < 2 {
        return false;
    }
    (0..pattern.len()).any(|i| {
        let a = &combination.per_winding[pattern[i]];
        let b = &combination.per_winding[pattern[(i + 1) % pattern.len()]];
        needs_margin_for_adjacent_pair(a, b)
    })
}

/// Checks that every winding has enough physical turns to be split across
/// `repetitions` sections; if not, merges into a single expanded pattern
/// dropping the under-provisioned windings from repetitions beyond the
/// first, and forces the repetition count to 1.
pub fn check_integrity(pattern: &Pattern, repetitions: u32, physical_turns: &[u32]) -> (Pattern, u32) {
    if repetitions <= 1 {
        return (pattern.clone(), repetitions);
    }
    let under_provisioned: Vec<usize> = pattern
        .iter()
        .copied()
        .filter(|&winding| physical_turns.get(winding).copied().unwrap_or(0) < repetitions)
        .collect();
    if under_provisioned.is_empty() {
        return (pattern.clone(), repetitions);
    }

    let mut expanded = Vec::new();
    for repetition in 0..repetitions {
        for &winding in pattern {
            if repetition == 0 || !under_provisioned.contains(&winding) {
                expanded.push(winding);
            }
        }
    }
    (expanded, 1)
}

#[cfg(test)]
mod tests {
    use om_core::dim::DimWithTol;
    use om_core::requirements::InsulationRequirement;
    use om_core::topology::Topology;

    use super::*;

    fn requirements_with(insulation_type: InsulationType) -> DesignRequirements {
        DesignRequirements {
            magnetizing_inductance: DimWithTol::from_nominal(1e-3),
            turns_ratios: vec![DimWithTol::from_nominal(1.0)],
            isolation_sides: vec![IsolationSide::PRIMARY, IsolationSide::SECONDARY],
            insulation: Some(InsulationRequirement {
                insulation_type,
                withstand_voltage: Some(3000.0),
            }),
            topology: Topology::Flyback,
            leakage_inductance: None,
        }
    }

    #[test]
    fn reinforced_emits_one_combination_per_side() {
        let requirements = requirements_with(InsulationType::Reinforced);
        let combos = derive_insulation_combinations(
            &requirements,
            &requirements.isolation_sides,
            true,
            false,
        );
        assert_eq!(combos.len(), 2);
    }

    #[test]
    fn no_insulation_requirement_yields_all_functional() {
        let mut requirements = requirements_with(InsulationType::Basic);
        requirements.insulation = None;
        let combos = derive_insulation_combinations(
            &requirements,
            &requirements.isolation_sides,
            true,
            false,
        );
        assert_eq!(combos.len(), 1);
        assert!(combos[0].per_winding.iter().all(|r| r.grade == 1 && r.layers == 1));
    }

    #[test]
    fn needs_margin_detects_thin_adjacent_pair() {
        let combo = InsulationCombination {
            per_winding: vec![
                WireSolidInsulationRequirements::functional(),
                WireSolidInsulationRequirements::functional(),
            ],
            tag: "t".to_string(),
        };
        assert!(needs_margin(&combo, &vec![0, 1]));
    }

    #[test]
    fn check_integrity_drops_under_provisioned_windings() {
        let pattern = vec![0, 1];
        let (expanded, repetitions) = check_integrity(&pattern, 2, &[5, 1]);
        assert_eq!(repetitions, 1);
        assert_eq!(expanded, vec![0, 1, 0]);
    }
}
