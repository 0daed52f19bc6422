//! Serializes an [`OrchestratorOutput`](crate::orchestrator::OrchestratorOutput)
//! into the array-of-instances JSON document §6 defines.

use serde::Serialize;

use crate::item::{Item, RotationPolicy};
use crate::model::Status;
use crate::prelude::Num;
use crate::state::SolutionState;

#[derive(Debug, Serialize)]
pub struct PlacementDoc {
    pub id: i64,
    pub position: [Num; 3],
    pub orientation: u8,
    pub size: [Num; 3],
    pub rotation_type: &'static str,
}

#[derive(Debug, Serialize)]
pub struct InstanceDoc {
    pub id: usize,
    pub size: [Num; 3],
    pub status: &'static str,
    pub placements: Vec<PlacementDoc>,
}

fn status_str(status: Option<Status>) -> &'static str {
    match status {
        Some(Status::Optimal) => "OPTIMAL",
        Some(Status::Feasible) => "FEASIBLE",
        Some(Status::Infeasible) => "INFEASIBLE",
        Some(Status::Unknown) | Some(Status::ModelInvalid) | None => "UNKNOWN",
    }
}

fn rotation_str(r: RotationPolicy) -> &'static str {
    match r {
        RotationPolicy::None => "none",
        RotationPolicy::Z => "z",
        RotationPolicy::Free => "free",
    }
}

/// Builds the output document for every *used* container instance,
/// numbered 1-based in the order they appear in `state`.
pub fn build(state: &SolutionState, items: &[Item], container_size: [Num; 3]) -> Vec<InstanceDoc> {
    let mut out = Vec::new();
    let mut next_id = 1usize;
    for (inst_idx, instance) in state.instances.iter().enumerate() {
        if instance.boxes.is_empty() {
            continue;
        }
        let result = &state.results[inst_idx];
        let placements = result
            .placements
            .iter()
            .map(|p| PlacementDoc {
                id: items[p.item_index].id,
                position: [p.pos.0, p.pos.1, p.pos.2],
                orientation: p.orient_idx,
                size: [p.size.l, p.size.w, p.size.h],
                rotation_type: rotation_str(items[p.item_index].rotation),
            })
            .collect();
        out.push(InstanceDoc { id: next_id, size: container_size, status: status_str(result.status), placements });
        next_id += 1;
    }
    out
}
