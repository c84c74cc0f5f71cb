//! Score ordering for suppression candidates.

use crate::candidate::RecordState;
use std::cmp::Ordering;

fn score_cmp_desc(a: f32, b: f32) -> Ordering {
    b.total_cmp(&a)
}

/// Returns indices of active records with a positive score, sorted by
/// descending score.
///
/// The sort is stable, so records with equal scores keep their original
/// (formatter) order.
pub(crate) fn candidates_desc(states: &[RecordState]) -> Vec<(usize, f32)> {
    let mut candidates: Vec<(usize, f32)> = states
        .iter()
        .enumerate()
        .filter_map(|(idx, state)| state.score().map(|score| (idx, score)))
        .filter(|&(_, score)| score > 0.0)
        .collect();
    candidates.sort_by(|a, b| score_cmp_desc(a.1, b.1));
    candidates
}

#[cfg(test)]
mod tests {
    use super::candidates_desc;
    use crate::candidate::RecordState::{Active, FilteredOut, Suppressed};

    #[test]
    fn candidates_skip_inactive_and_zero_scores() {
        let states = [Active(0.2), FilteredOut, Active(0.0), Suppressed, Active(0.7)];
        let order = candidates_desc(&states);
        assert_eq!(order, vec![(4, 0.7), (0, 0.2)]);
    }

    #[test]
    fn equal_scores_keep_record_order() {
        let states = [Active(0.5), Active(0.9), Active(0.5), Active(0.5)];
        let order: Vec<usize> = candidates_desc(&states).into_iter().map(|c| c.0).collect();
        assert_eq!(order, vec![1, 0, 2, 3]);
    }
}
