//! Pattern and repetition derivation.

use itertools::Itertools;
use om_core::settings::defaults;
use om_core::topology::IsolationSide;

/// One winding order, e.g. `[0, 1]` meaning "primary then secondary".
pub type Pattern = Vec<usize>;

/// Derives the distinct winding-index patterns implied by
/// `isolation_sides` (one entry per winding, in winding-index order).
///
/// Groups windings by isolation side in first-occurrence order, then
/// enumerates permutations of the side groups (each side's windings stay
/// adjacent and keep their relative order), capped at
/// `min(K!/2, MAXIMUM_COIL_PATTERN)` where `K` is the number of distinct
/// sides. For toroidal cores the last permutation is dropped because
/// toroid sections wrap and it would duplicate the first.
pub fn derive_patterns(isolation_sides: &[IsolationSide], is_toroidal: bool) -> Vec<Pattern> {
    let mut distinct_sides: Vec<IsolationSide> = Vec::new();
    for side in isolation_sides {
        if !distinct_sides.contains(side) {
            distinct_sides.push(*side);
        }
    }

    let groups: Vec<Vec<usize>> = distinct_sides
        .iter()
        .map(|side| {
            isolation_sides
                .iter()
                .enumerate()
                .filter(|(_, s)| *s == side)
                .map(|(index, _)| index)
                .collect()
        })
        .collect();

    let k = groups.len();
    let factorial: usize = (1..=k).product::<usize>().max(1);
    let cap = (factorial / 2).max(1).min(defaults::MAXIMUM_COIL_PATTERN);

    let mut patterns: Vec<Pattern> = (0..groups.len())
        .permutations(groups.len())
        .take(cap + if is_toroidal { 1 } else { 0 })
        .map(|order| order.into_iter().flat_map(|i| groups[i].clone()).collect())
        .collect();

    if is_toroidal && patterns.len() > 1 {
        patterns.pop();
    }
    patterns.truncate(cap);
    patterns
}

/// Derives the candidate repetition counts for a pattern: a single winding or a toroidal core never repeats; otherwise
/// `{2, 1}` when a leakage-inductance requirement is present (interleaving
/// is tried first), else `{1, 2}`.
pub fn derive_repetitions(number_of_windings: usize, is_toroidal: bool, has_leakage_requirement: bool) -> Vec<u32> {
    if number_of_windings <= 1 || is_toroidal {
        return vec![1];
    }
    if has_leakage_requirement {
        vec![2, 1]
    } else {
        vec![1, 2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_patterns_groups_by_isolation_side() {
        let sides = [IsolationSide::PRIMARY, IsolationSide::SECONDARY, IsolationSide::SECONDARY];
        let patterns = derive_patterns(&sides, false);
        assert!(!patterns.is_empty());
        for pattern in &patterns {
            assert_eq!(pattern.len(), 3);
        }
    }

    #[test]
    fn derive_patterns_caps_at_maximum_coil_pattern() {
        let sides: Vec<IsolationSide> = (0..6).map(|i| IsolationSide::nth(i)).collect();
        let patterns = derive_patterns(&sides, false);
        assert!(patterns.len() <= defaults::MAXIMUM_COIL_PATTERN);
    }

    #[test]
    fn derive_repetitions_prefers_interleaving_under_leakage_requirement() {
        assert_eq!(derive_repetitions(2, false, true), vec![2, 1]);
        assert_eq!(derive_repetitions(2, false, false), vec![1, 2]);
        assert_eq!(derive_repetitions(1, false, true), vec![1]);
        assert_eq!(derive_repetitions(2, true, true), vec![1]);
    }
}
