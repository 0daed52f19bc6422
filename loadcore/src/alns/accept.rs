//! Acceptance Criterion: decides whether a repaired-and-evaluated
//! candidate replaces the current and/or best state. Feasibility is
//! checked first; a fixed 5% uphill branch lets the search escape
//! local optima.

use rand::rngs::StdRng;
use rand::Rng;

use crate::state::SolutionState;

const UPHILL_PROBABILITY: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    RejectCandidate,
    AcceptAsCurrent,
    AcceptAsBest,
}

/// `best`/`current` scores are read from their caches, which callers
/// must have populated via [`crate::evaluator::evaluate`] beforehand.
pub fn decide(best: &SolutionState, current: &SolutionState, candidate: &SolutionState, rng: &mut StdRng) -> Decision {
    if !candidate.is_feasible() {
        return Decision::RejectCandidate;
    }
    let candidate_score = candidate.cached_score().expect("candidate must be scored before acceptance");
    let best_score = best.cached_score().expect("best must be scored before acceptance");
    let current_score = current.cached_score().expect("current must be scored before acceptance");

    if candidate_score < best_score {
        Decision::AcceptAsBest
    } else if candidate_score < current_score {
        Decision::AcceptAsCurrent
    } else if rng.gen_bool(UPHILL_PROBABILITY) {
        Decision::AcceptAsCurrent
    } else {
        Decision::RejectCandidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn scored(assignment: &[usize], num_instances: usize, score: i64, feasible: bool) -> SolutionState {
        let mut s = SolutionState::from_assignment(assignment, num_instances);
        if !feasible {
            s.results[0].status = Some(crate::model::Status::Infeasible);
        }
        s.set_cached_score(score);
        s
    }

    #[test]
    fn infeasible_candidate_is_rejected() {
        let best = scored(&[0], 1, -1, true);
        let current = scored(&[0], 1, -1, true);
        let candidate = scored(&[0], 1, -5, false);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(decide(&best, &current, &candidate, &mut rng), Decision::RejectCandidate);
    }

    #[test]
    fn strictly_better_candidate_becomes_best() {
        let best = scored(&[0], 1, 0, true);
        let current = scored(&[0], 1, 0, true);
        let candidate = scored(&[0], 1, -3, true);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(decide(&best, &current, &candidate, &mut rng), Decision::AcceptAsBest);
    }

    #[test]
    fn candidate_between_current_and_best_becomes_current() {
        let best = scored(&[0], 1, -10, true);
        let current = scored(&[0], 1, 0, true);
        let candidate = scored(&[0], 1, -2, true);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(decide(&best, &current, &candidate, &mut rng), Decision::AcceptAsCurrent);
    }
}
