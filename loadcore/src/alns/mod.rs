//! Adaptive large-neighborhood search over [`crate::state::SolutionState`]:
//! destroy, repair, re-evaluate, accept, repeat until [`stop`] says
//! stop. The loop itself is strictly serial — the only parallelism in
//! the whole pipeline lives inside the solver drivers DO/RO/PE call
//! into.

pub mod accept;
pub mod destroy;
pub mod repair;
pub mod stop;

use rand::rngs::StdRng;

use crate::evaluator;
use crate::placement::PlacementSettings;
use crate::prelude::*;
use crate::state::SolutionState;

pub struct AlnsParams {
    pub remove: destroy::RemoveAmount,
    pub repair: repair::RepairParams,
    pub placement: PlacementSettings,
    pub stop: stop::StopParams,
    pub solver_workers: usize,
}

pub struct AlnsOutcome {
    pub best: SolutionState,
    pub iterations_run: u64,
}

/// Runs the full `destroy -> repair -> evaluate -> accept -> stop?`
/// loop starting from an already-scored `initial` state.
pub fn run(initial: SolutionState, items: &[Item], container: &ContainerSpec, params: &AlnsParams, rng: &mut StdRng) -> AlnsOutcome {
    let mut best = initial.clone();
    let mut current = initial;
    let mut sc = stop::StoppingCriterion::new(params.stop);
    let mut seed_counter: u64 = 0;

    while !sc.should_stop() {
        seed_counter += 1;
        let destroyed = destroy::destroy(&current, params.remove, rng);
        let mut candidate = repair::repair(&destroyed, &current, items, container, &params.repair, seed_counter);
        evaluator::evaluate(&mut candidate, items, container, &params.placement, seed_counter, params.solver_workers);

        let decision = accept::decide(&best, &current, &candidate, rng);
        let improved = matches!(decision, accept::Decision::AcceptAsBest);
        match decision {
            accept::Decision::AcceptAsBest => {
                current = candidate.clone();
                best = candidate;
            }
            accept::Decision::AcceptAsCurrent => {
                current = candidate;
            }
            accept::Decision::RejectCandidate => {}
        }
        sc.record_iteration(improved);
    }

    AlnsOutcome { best, iterations_run: sc.iterations() }
}
