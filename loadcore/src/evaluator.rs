//! Placement Evaluator: for every used container instance in a state,
//! runs PMB + its engine and folds the resulting statuses into one
//! scalar the outer loop minimizes. Caches on the state; callers must
//! invalidate before re-scoring a mutated state.

use crate::model::Status;
use crate::placement::{self, PlacementSettings};
use crate::prelude::*;
use crate::state::{ContainerResult, SolutionState};

/// `score = 1000*|INFEASIBLE| + 500*|UNKNOWN| - 2*|OPTIMAL| - 1*|FEASIBLE|`,
/// lower is better.
pub fn score_of(results: &[ContainerResult]) -> Num {
    let mut score: Num = 0;
    for r in results {
        score += match r.status {
            Some(Status::Infeasible) => 1000,
            Some(Status::Unknown) => 500,
            Some(Status::Optimal) => -2,
            Some(Status::Feasible) => -1,
            Some(Status::ModelInvalid) | None => 0,
        };
    }
    score
}

/// Runs PMB+SD on every non-empty instance of `state`, writes the
/// per-container results back, and returns (and caches) the aggregate
/// score. Empty instances are skipped entirely — they contribute
/// neither penalty nor reward.
pub fn evaluate(
    state: &mut SolutionState,
    items: &[Item],
    container: &ContainerSpec,
    settings: &PlacementSettings,
    seed: u64,
    workers: usize,
) -> Num {
    for (inst_idx, instance) in state.instances.iter().enumerate() {
        if instance.boxes.is_empty() {
            state.results[inst_idx] = ContainerResult::default();
            continue;
        }
        let result = placement::solve(items, &instance.boxes, container, settings, seed.wrapping_add(inst_idx as u64), workers);
        state.results[inst_idx] = ContainerResult { status: Some(result.status), placements: result.placements };
    }
    let score = score_of(&state.results);
    state.set_cached_score(score);
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::{AnchorMode, PlacementWeights, SymmetryMode};

    fn settings() -> PlacementSettings {
        PlacementSettings {
            symmetry_mode: SymmetryMode::Simple,
            anchor_mode: AnchorMode::Larger,
            weights: PlacementWeights::default(),
            max_time: Duration::from_millis(200),
        }
    }

    #[test]
    fn single_feasible_instance_scores_negative_one() {
        let container = ContainerSpec { l: 4, w: 4, h: 4, weight_max: 100 };
        let items = vec![Item { id: 1, size: Size::new(1, 1, 1), weight: 1, rotation: RotationPolicy::Free, group: None }];
        let mut state = SolutionState::from_assignment(&[0], 1);
        let score = evaluate(&mut state, &items, &container, &settings(), 1, 1);
        assert_eq!(score, -1);
        assert!(state.is_feasible());
        assert_eq!(state.cached_score(), Some(-1));
    }

    #[test]
    fn oversized_item_scores_infeasible() {
        let container = ContainerSpec { l: 1, w: 1, h: 1, weight_max: 100 };
        let items = vec![Item { id: 1, size: Size::new(5, 5, 5), weight: 1, rotation: RotationPolicy::Free, group: None }];
        let mut state = SolutionState::from_assignment(&[0], 1);
        let score = evaluate(&mut state, &items, &container, &settings(), 1, 1);
        assert_eq!(score, 1000);
        assert!(!state.is_feasible());
    }
}
