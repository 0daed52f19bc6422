//! Destroy Operator: deep-copies a state, then unassigns a random
//! subset of its boxes. The only source of non-determinism here is the
//! RNG passed in by the orchestrator — sampling itself is plain
//! `rand::seq::index::sample`.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::state::SolutionState;

#[derive(Debug, Clone, Copy)]
pub enum RemoveAmount {
    Absolute(usize),
    Percent(u8),
}

impl RemoveAmount {
    fn resolve(&self, total: usize) -> usize {
        match *self {
            RemoveAmount::Absolute(n) => n.min(total),
            RemoveAmount::Percent(p) => (total * (p.min(100) as usize)) / 100,
        }
    }
}

/// Returns a fresh state with `amount` box assignments removed (sampled
/// uniformly without replacement from the flat list of
/// `(instance, box)` entries) and recorded on `removed`.
pub fn destroy(state: &SolutionState, amount: RemoveAmount, rng: &mut StdRng) -> SolutionState {
    let mut next = state.clone();
    next.removed.clear();

    let mut flat: Vec<(usize, usize)> = Vec::new();
    for (inst_idx, inst) in next.instances.iter().enumerate() {
        for pos in 0..inst.boxes.len() {
            flat.push((inst_idx, pos));
        }
    }

    let take = amount.resolve(flat.len());
    flat.shuffle(rng);
    let mut to_remove = flat[..take].to_vec();
    // Remove back-to-front per instance so earlier swap_remove calls
    // don't invalidate later positions within the same instance.
    to_remove.sort_unstable_by(|a, b| b.1.cmp(&a.1));

    for (inst_idx, pos) in to_remove {
        let box_idx = next.instances[inst_idx].boxes.swap_remove(pos);
        next.removed.push(box_idx);
    }

    next.invalidate();
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn removes_requested_count() {
        let assignment = vec![0, 0, 0, 1, 1];
        let state = SolutionState::from_assignment(&assignment, 2);
        let mut rng = StdRng::seed_from_u64(42);
        let next = destroy(&state, RemoveAmount::Absolute(2), &mut rng);
        assert_eq!(next.removed.len(), 2);
        assert_eq!(next.box_count(), 3);
    }

    #[test]
    fn percent_is_clamped_to_total() {
        let assignment = vec![0, 0];
        let state = SolutionState::from_assignment(&assignment, 1);
        let mut rng = StdRng::seed_from_u64(1);
        let next = destroy(&state, RemoveAmount::Percent(150), &mut rng);
        assert_eq!(next.removed.len(), 2);
    }
}
