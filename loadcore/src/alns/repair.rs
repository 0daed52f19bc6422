//! Repair Operator: re-solves Phase 1 with every still-present box
//! pinned to its current instance, then rebuilds a full assignment
//! from the solution. A failed repair (no incumbent within the time
//! limit) is a no-op — `before` (the fully-assigned state the destroy
//! step started from) is handed back unchanged, never the destroyed,
//! partially-unassigned state, since the latter has boxes missing from
//! every instance and would otherwise slip past `accept::decide`'s
//! feasibility gate as a silently incomplete "solution".

use crate::assign::{self, AssignInput, AssignWeights, FixedAssignments};
use crate::model::solver;
use crate::prelude::*;
use crate::state::SolutionState;

pub struct RepairParams {
    pub weights: AssignWeights,
    pub max_time: Duration,
    pub solver_workers: usize,
}

/// `state` is assumed already destroyed (has unassigned boxes recorded
/// in `removed`); `before` is the fully-assigned state it was destroyed
/// from. Returns a new, fully-assigned state, or a clone of `before`
/// unchanged if Phase 1 could not find a feasible rebuild — never a
/// clone of the partial `state`, which is missing `state.removed`'s
/// boxes from every instance and is not itself a valid assignment.
pub fn repair(
    state: &SolutionState,
    before: &SolutionState,
    items: &[Item],
    container: &ContainerSpec,
    params: &RepairParams,
    seed: u64,
) -> SolutionState {
    let present_count = state.box_count();
    let j_bound = present_count + state.removed.len();

    let mut fixed: FixedAssignments = HashMap::new();
    for (inst_idx, inst) in state.instances.iter().enumerate() {
        for &box_idx in &inst.boxes {
            fixed.insert(box_idx, inst_idx);
        }
    }

    let input = AssignInput {
        items,
        container,
        j_bound: j_bound.max(1),
        fixed_assignments: &fixed,
        weights: params.weights,
    };
    let built = assign::build(&input);
    let sol = solver::solve(&built.model, params.max_time, None, seed, params.solver_workers);

    if !sol.status.has_incumbent() {
        return before.clone();
    }

    let assignment = assign::decode_assignment(&built.vars, &sol.values);
    let mut next = SolutionState::from_assignment(&assignment, j_bound.max(1));
    next.invalidate();
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alns::destroy::{destroy, RemoveAmount};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn repair_reassigns_all_boxes() {
        let container = ContainerSpec { l: 10, w: 10, h: 10, weight_max: 100 };
        let items: Vec<Item> = (0..4)
            .map(|i| Item { id: i, size: Size::new(1, 1, 1), weight: 1, rotation: RotationPolicy::Free, group: None })
            .collect();
        let state = SolutionState::from_assignment(&[0, 0, 1, 1], 2);
        let mut rng = StdRng::seed_from_u64(3);
        let destroyed = destroy(&state, RemoveAmount::Absolute(2), &mut rng);

        let params = RepairParams { weights: AssignWeights::default(), max_time: Duration::from_millis(300), solver_workers: 2 };
        let repaired = repair(&destroyed, &state, &items, &container, &params, 9);
        assert_eq!(repaired.box_count(), 4);
    }

    #[test]
    fn failed_repair_falls_back_to_pre_destroy_state_not_the_partial_one() {
        let container = ContainerSpec { l: 10, w: 10, h: 10, weight_max: 100 };
        let items: Vec<Item> = (0..4)
            .map(|i| Item { id: i, size: Size::new(1, 1, 1), weight: 1, rotation: RotationPolicy::Free, group: None })
            .collect();
        let state = SolutionState::from_assignment(&[0, 0, 1, 1], 2);
        let mut rng = StdRng::seed_from_u64(3);
        let destroyed = destroy(&state, RemoveAmount::Absolute(2), &mut rng);

        // A zero time budget guarantees Phase 1 reports no incumbent.
        let params = RepairParams { weights: AssignWeights::default(), max_time: Duration::from_millis(0), solver_workers: 1 };
        let repaired = repair(&destroyed, &state, &items, &container, &params, 9);
        assert_eq!(repaired.box_count(), 4, "fallback must be the fully-assigned pre-destroy state, not the partial one");
    }
}
