//! The unit ALNS manipulates: a full assignment plus whatever
//! placements have been computed for it, a cached aggregate score, and
//! a dirty flag invalidated by mutation. Copying a state is
//! `O(total boxes)` — cheap enough to run thousands of times per
//! second, since the assignment is its only variable-sized component.

use crate::model::Status;
use crate::placement::Placement;
use crate::prelude::*;

/// One container instance's box membership, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Instance {
    pub boxes: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct ContainerResult {
    pub status: Option<Status>,
    pub placements: Vec<Placement>,
}

#[derive(Debug, Clone)]
pub struct SolutionState {
    pub instances: Vec<Instance>,
    pub results: Vec<ContainerResult>,
    /// Boxes a destroy step most recently unassigned; consumed by the
    /// repair operator and cleared once it rebuilds a full assignment.
    pub removed: Vec<usize>,
    score: Cell<Option<Num>>,
}

impl SolutionState {
    pub fn from_assignment(assignment: &[usize], num_instances: usize) -> Self {
        let mut instances = vec![Instance::default(); num_instances];
        for (box_idx, &inst) in assignment.iter().enumerate() {
            instances[inst].boxes.push(box_idx);
        }
        Self { instances, results: vec![ContainerResult::default(); num_instances], removed: vec![], score: Cell::new(None) }
    }

    pub fn used_instance_count(&self) -> usize {
        self.instances.iter().filter(|i| !i.boxes.is_empty()).count()
    }

    pub fn box_count(&self) -> usize {
        self.instances.iter().map(|i| i.boxes.len()).sum()
    }

    /// Flattens the current assignment back into a per-box instance
    /// index, the shape AMB's `fixed_assignments` and the final output
    /// both need.
    pub fn to_assignment(&self, num_boxes: usize) -> Vec<usize> {
        let mut out = vec![0usize; num_boxes];
        for (inst_idx, inst) in self.instances.iter().enumerate() {
            for &b in &inst.boxes {
                out[b] = inst_idx;
            }
        }
        out
    }

    pub fn cached_score(&self) -> Option<Num> {
        self.score.get()
    }

    pub fn set_cached_score(&self, score: Num) {
        self.score.set(Some(score));
    }

    pub fn invalidate(&self) {
        self.score.set(None);
    }

    /// `true` iff no container instance in this state carries an
    /// `INFEASIBLE` placement status.
    pub fn is_feasible(&self) -> bool {
        self.results.iter().all(|r| r.status != Some(Status::Infeasible))
    }
}
