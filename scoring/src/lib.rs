//! Candidate scoring: per-filter normalisation, cross-filter accumulation,
//! and stable ranking, shared by the wire advisor's AC-behaviour scoring
//! and the coil advisor's per-combination ranking.

/// Normalises a raw score vector to `[0, weight]`.
///
/// `min_score = max(min(raw), 1e-4)` and `max_score = max(raw)`. When
/// `max_score == min_score` every output is `weight`. Otherwise each raw
/// value is mapped linearly (or, when `log` is set, by the ratio of
/// logarithms) onto `[0, 1]`, optionally inverted, then scaled by `weight`.
pub fn normalise(raw: &[f64], log: bool, invert: bool, weight: f64) -> Vec<f64> {
    if raw.is_empty() {
        return Vec::new();
    }
    let raw_min = raw.iter().cloned().fold(f64::INFINITY, f64::min);
    let raw_max = raw.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min_score = raw_min.max(1e-4);
    let max_score = raw_max;

    if max_score == min_score {
        return vec![weight; raw.len()];
    }

    raw.iter()
        .map(|&value| {
            let x = if log {
                let value = value.max(min_score);
                (value.ln() - min_score.ln()) / (max_score.ln() - min_score.ln())
            } else {
                (value - min_score) / (max_score - min_score)
            };
            let x = if invert { 1.0 - x } else { x };
            x * weight
        })
        .collect()
}

/// Sums per-filter normalised score vectors elementwise, producing one
/// total score per candidate. All vectors in `filters` must have the same
/// length (the candidate count); an empty `filters` yields an all-zero
/// vector of length `candidate_count`.
pub fn accumulate(filters: &[Vec<f64>], candidate_count: usize) -> Vec<f64> {
    let mut totals = vec![0.0; candidate_count];
    for filter in filters {
        for (total, score) in totals.iter_mut().zip(filter.iter()) {
            *total += score;
        }
    }
    totals
}

/// Stably sorts `items` descending by `scores[i]`, then truncates to the
/// first `k` entries. Ties preserve the candidates' original relative
/// order.
pub fn rank<T>(mut items: Vec<T>, scores: &[f64], k: usize) -> Vec<T> {
    assert_eq!(items.len(), scores.len(), "items and scores must have matching length");
    let mut indices: Vec<usize> = (0..items.len()).collect();
    indices.sort_by(|&a, &b| {
        scores[b].partial_cmp(&scores[a]).unwrap_or(std::cmp::Ordering::Equal)
    });
    indices.truncate(k);

    let mut slots: Vec<Option<T>> = items.drain(..).map(Some).collect();
    indices.into_iter().map(|i| slots[i].take().expect("each index used once")).collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn normalise_maps_min_max_to_endpoints() {
        let scores = normalise(&[1.0, 2.0, 3.0], false, false, 1.0);
        assert_relative_eq!(scores[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(scores[2], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn normalise_inverts_when_requested() {
        let scores = normalise(&[1.0, 2.0, 3.0], false, true, 1.0);
        assert_relative_eq!(scores[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(scores[2], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn normalise_constant_input_yields_weight() {
        let scores = normalise(&[5.0, 5.0, 5.0], false, false, 2.5);
        assert_eq!(scores, vec![2.5, 2.5, 2.5]);
    }

    #[test]
    fn normalise_log_scales_logarithmically() {
        let scores = normalise(&[1.0, 10.0, 100.0], true, false, 1.0);
        assert_relative_eq!(scores[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(scores[2], 1.0, epsilon = 1e-6);
        assert!(scores[1] > 0.0 && scores[1] < 1.0);
    }

    #[test]
    fn accumulate_sums_filters_elementwise() {
        let totals = accumulate(&[vec![1.0, 2.0], vec![0.5, 0.5]], 2);
        assert_eq!(totals, vec![1.5, 2.5]);
    }

    #[test]
    fn rank_sorts_descending_and_truncates() {
        let items = vec!["a", "b", "c"];
        let scores = vec![0.1, 0.9, 0.5];
        let ranked = rank(items, &scores, 2);
        assert_eq!(ranked, vec!["b", "c"]);
    }

    #[test]
    fn rank_preserves_order_on_ties() {
        let items = vec!["a", "b", "c"];
        let scores = vec![1.0, 1.0, 1.0];
        let ranked = rank(items, &scores, 3);
        assert_eq!(ranked, vec!["a", "b", "c"]);
    }
}
