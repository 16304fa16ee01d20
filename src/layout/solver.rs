//! Shared partition search machinery for the exhaustive strategies.
//!
//! The clamped-height and hero-pattern strategies both enumerate candidate
//! row-count partitions, score each one, and keep the minimum. They differ
//! only in how a concrete partition is turned into rows and scored, so that
//! step is a policy (`CandidateEvaluator`) and the enumeration/selection
//! loop lives here once. The dynamic-grid strategy is greedy by design and
//! does not go through this module.

use super::{RatioItem, Row};

/// A scored layout considered during search; discarded after selection.
pub(crate) struct Candidate {
    pub score: f64,
    pub counts: Vec<usize>,
    pub rows: Vec<Row>,
}

/// Turns a concrete partition of `items` into a scored candidate, or rejects
/// it (hard-constraint violation). One instance per strategy.
pub(crate) trait CandidateEvaluator {
    fn evaluate(&self, items: &[RatioItem], counts: &[usize]) -> Option<Candidate>;
}

/// Keeps the minimum-score candidate seen so far.
///
/// Scores are floats and exact ties are not expected in practice, but the
/// tie-break is still deterministic: on an exact tie prefer fewer rows, then
/// lexicographically smaller counts. Enumeration order never matters.
#[derive(Default)]
pub(crate) struct Selector {
    best: Option<Candidate>,
}

impl Selector {
    pub fn offer(&mut self, candidate: Candidate) {
        let replace = match &self.best {
            None => true,
            Some(best) => {
                candidate.score < best.score
                    || (candidate.score == best.score && prefers(&candidate, best))
            }
        };
        if replace {
            self.best = Some(candidate);
        }
    }

    pub fn into_best(self) -> Option<Candidate> {
        self.best
    }
}

/// Tie-break: fewer rows first, then lexicographically smaller counts.
fn prefers(candidate: &Candidate, best: &Candidate) -> bool {
    candidate.counts.len() < best.counts.len()
        || (candidate.counts.len() == best.counts.len() && candidate.counts < best.counts)
}

/// Valid row counts for `n` items under per-row bounds:
/// `ceil(n / max_per_row) ..= floor(n / min_per_row)`. Bounds of zero are
/// treated as one rather than dividing by it.
pub(crate) fn row_count_range(n: usize, min_per_row: usize, max_per_row: usize) -> (usize, usize) {
    let min_rows = n.div_ceil(max_per_row.max(1)).max(1);
    let max_rows = n / min_per_row.max(1);
    (min_rows, max_rows)
}

/// The canonical most-even partition of `n` items into `rows` rows: the
/// first `n % rows` rows take one extra item.
pub(crate) fn even_counts(n: usize, rows: usize) -> Vec<usize> {
    let base = n / rows;
    let extra = n % rows;
    (0..rows)
        .map(|index| base + usize::from(index < extra))
        .collect()
}

/// Whether every row count sits inside `[min_per_row, max_per_row]`.
/// Boundary row counts can fall outside the band even for a valid row total.
pub(crate) fn counts_within(counts: &[usize], min_per_row: usize, max_per_row: usize) -> bool {
    counts
        .iter()
        .all(|&count| count >= min_per_row && count <= max_per_row)
}

/// Enumerate the canonical even partition for every valid row count and feed
/// the accepted candidates into `selector`.
pub(crate) fn search_even_partitions<E: CandidateEvaluator>(
    items: &[RatioItem],
    min_per_row: usize,
    max_per_row: usize,
    evaluator: &E,
    selector: &mut Selector,
) {
    let (min_rows, max_rows) = row_count_range(items.len(), min_per_row, max_per_row);
    for rows in min_rows..=max_rows {
        let counts = even_counts(items.len(), rows);
        if !counts_within(&counts, min_per_row, max_per_row) {
            continue;
        }
        if let Some(candidate) = evaluator.evaluate(items, &counts) {
            selector.offer(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(score: f64, counts: Vec<usize>) -> Candidate {
        Candidate {
            score,
            counts,
            rows: Vec::new(),
        }
    }

    #[test]
    fn even_counts_distributes_remainder_to_leading_rows() {
        assert_eq!(even_counts(7, 3), vec![3, 2, 2]);
        assert_eq!(even_counts(8, 2), vec![4, 4]);
        assert_eq!(even_counts(5, 5), vec![1, 1, 1, 1, 1]);
    }

    #[test]
    fn row_count_range_matches_per_row_bounds() {
        assert_eq!(row_count_range(10, 2, 5), (2, 5));
        assert_eq!(row_count_range(5, 2, 5), (1, 2));
        // Degenerate bounds never divide by zero.
        assert_eq!(row_count_range(4, 0, 0), (4, 4));
    }

    #[test]
    fn selector_keeps_minimum_score() {
        let mut selector = Selector::default();
        selector.offer(candidate(10.0, vec![3, 3]));
        selector.offer(candidate(4.0, vec![2, 2, 2]));
        selector.offer(candidate(7.5, vec![6]));
        let best = selector.into_best().unwrap();
        assert_eq!(best.score, 4.0);
        assert_eq!(best.counts, vec![2, 2, 2]);
    }

    #[test]
    fn exact_ties_prefer_fewer_rows_then_smaller_counts() {
        let mut selector = Selector::default();
        selector.offer(candidate(5.0, vec![2, 2, 2]));
        selector.offer(candidate(5.0, vec![3, 3]));
        assert_eq!(selector.into_best().unwrap().counts, vec![3, 3]);

        let mut selector = Selector::default();
        selector.offer(candidate(5.0, vec![4, 2]));
        selector.offer(candidate(5.0, vec![2, 4]));
        assert_eq!(selector.into_best().unwrap().counts, vec![2, 4]);
    }

    #[test]
    fn tie_break_is_independent_of_enumeration_order() {
        for order in [[0usize, 1], [1, 0]] {
            let all = [candidate(5.0, vec![3, 3]), candidate(5.0, vec![2, 2, 2])];
            let mut selector = Selector::default();
            for &index in &order {
                selector.offer(candidate(all[index].score, all[index].counts.clone()));
            }
            assert_eq!(selector.into_best().unwrap().counts, vec![3, 3]);
        }
    }
}
