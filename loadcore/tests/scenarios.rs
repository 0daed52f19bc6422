//! End-to-end scenarios run through `orchestrator::run` directly
//! (bypassing JSON I/O), one per concrete scenario plus the boundary
//! behaviors called out alongside them.

use std::time::Duration;

use loadcore::alns::destroy::RemoveAmount;
use loadcore::alns::repair::RepairParams;
use loadcore::alns::stop::StopParams;
use loadcore::alns::AlnsParams;
use loadcore::assign::AssignWeights;
use loadcore::error::LoadError;
use loadcore::item::{Item, RotationPolicy, Size};
use loadcore::model::Status;
use loadcore::orchestrator::{self, OrchestratorConfig};
use loadcore::placement::{AnchorMode, PlacementSettings, PlacementWeights, SymmetryMode};
use loadcore::ContainerSpec;

fn item(id: i64, l: i64, w: i64, h: i64, weight: i64, rotation: RotationPolicy) -> Item {
    Item { id, size: Size::new(l, w, h), weight, rotation, group: None }
}

fn item_grouped(id: i64, l: i64, w: i64, h: i64, weight: i64, rotation: RotationPolicy, group: i64) -> Item {
    Item { id, size: Size::new(l, w, h), weight, rotation, group: Some(group) }
}

fn default_placement() -> PlacementSettings {
    PlacementSettings {
        symmetry_mode: SymmetryMode::Simple,
        anchor_mode: AnchorMode::Larger,
        weights: PlacementWeights::default(),
        max_time: Duration::from_millis(500),
    }
}

fn config_without_alns() -> OrchestratorConfig {
    OrchestratorConfig {
        phase1_max_time: Duration::from_millis(500),
        assign_weights: AssignWeights::default(),
        placement: default_placement(),
        alns: None,
        solver_workers: 2,
        rng_seed: 12345,
        verbose: false,
    }
}

#[test]
fn s1_single_fit() {
    let container = ContainerSpec { l: 4, w: 4, h: 2, weight_max: 1000 };
    let items = vec![
        item(1, 1, 1, 4, 10, RotationPolicy::Free),
        item(2, 2, 2, 1, 5, RotationPolicy::Free),
    ];
    let result = orchestrator::run(&items, &container, &config_without_alns()).expect("expected a feasible run");
    assert_eq!(result.state.used_instance_count(), 1);

    let instance = result.state.instances.iter().find(|i| !i.boxes.is_empty()).unwrap();
    assert_eq!(instance.boxes.len(), 2);

    let container_results = &result.state.results[result.state.instances.iter().position(|i| !i.boxes.is_empty()).unwrap()];
    assert_eq!(container_results.placements.len(), 2);
    for p in &container_results.placements {
        assert!(p.pos.0 >= 0 && p.pos.1 >= 0 && p.pos.2 >= 0);
        assert!(p.pos.0 + p.size.l <= container.l);
        assert!(p.pos.1 + p.size.w <= container.w);
        assert!(p.pos.2 + p.size.h <= container.h);
    }
    // Box 1's longest axis (4) must lie along x or y, never z (h=2).
    let box1 = container_results.placements.iter().find(|p| p.item_index == 0).unwrap();
    assert_ne!(box1.size.h, 4);
}

#[test]
fn s2_capacity_forces_split() {
    // Container volume 100 (e.g. 10x10x1), W_max=20. Ten identical items
    // each weight=3, volume=15 (e.g. 5x3x1).
    let container = ContainerSpec { l: 10, w: 10, h: 1, weight_max: 20 };
    let items: Vec<Item> = (0..10).map(|i| item(i, 5, 3, 1, 3, RotationPolicy::None)).collect();

    let j_bound = orchestrator::tight_j_bound(&items, &container);
    assert!(j_bound >= 2);

    let result = orchestrator::run(&items, &container, &config_without_alns()).expect("expected a feasible run");
    // A heuristic local search is not guaranteed to reach the 2-instance
    // optimum, only a feasible split; capacity holding per instance is
    // what's actually invariant here.
    assert!(result.state.used_instance_count() >= 2);
    for instance in result.state.instances.iter().filter(|i| !i.boxes.is_empty()) {
        let total_weight: i64 = instance.boxes.iter().map(|&b| items[b].weight).sum();
        let total_volume: i64 = instance.boxes.iter().map(|&b| items[b].volume()).sum();
        assert!(total_weight <= container.weight_max);
        assert!(total_volume <= container.volume());
    }
}

#[test]
fn s3_group_cohesion_preference() {
    let container = ContainerSpec { l: 10, w: 5, h: 1, weight_max: 20 };
    let mut items = vec![];
    for i in 0..5 {
        items.push(item_grouped(i, 2, 1, 1, 1, RotationPolicy::None, 1));
    }
    for i in 5..10 {
        items.push(item_grouped(i, 2, 2, 1, 1, RotationPolicy::None, 2));
    }

    let result = orchestrator::run(&items, &container, &config_without_alns()).expect("expected a feasible run");
    assert_eq!(result.state.used_instance_count(), 1);

    for group in [1i64, 2i64] {
        let touched: std::collections::HashSet<usize> = result
            .state
            .instances
            .iter()
            .enumerate()
            .filter(|(_, inst)| inst.boxes.iter().any(|&b| items[b].group == Some(group)))
            .map(|(idx, _)| idx)
            .collect();
        assert_eq!(touched.len(), 1, "group {group} should not be split");
    }
}

#[test]
fn s4_no_floating_enforcement() {
    let container = ContainerSpec { l: 10, w: 10, h: 10, weight_max: 1000 };
    let items = vec![item(1, 10, 10, 1, 50, RotationPolicy::None), item(2, 5, 5, 1, 5, RotationPolicy::None)];
    let result = orchestrator::run(&items, &container, &config_without_alns()).expect("expected a feasible run");

    let inst_idx = result.state.instances.iter().position(|i| !i.boxes.is_empty()).unwrap();
    let placements = &result.state.results[inst_idx].placements;
    assert_eq!(placements.len(), 2);

    let box_a = placements.iter().find(|p| p.item_index == 0).unwrap();
    let box_b = placements.iter().find(|p| p.item_index == 1).unwrap();
    assert_eq!(box_a.pos, (0, 0, 0));
    // B must rest flush on A's top face, never floating above it.
    assert_eq!(box_b.pos.2, box_a.pos.2 + box_a.size.h);
    assert!(box_b.pos.0 + box_b.size.l <= box_a.pos.0 + box_a.size.l);
    assert!(box_b.pos.1 + box_b.size.w <= box_a.pos.1 + box_a.size.w);
}

#[test]
fn s5_rotation_policy_excludes_non_fitting_orientation() {
    let container = ContainerSpec { l: 5, w: 3, h: 3, weight_max: 100 };
    let items = vec![item(1, 4, 2, 1, 1, RotationPolicy::Z)];
    let result = orchestrator::run(&items, &container, &config_without_alns()).expect("expected a feasible run");
    let inst_idx = result.state.instances.iter().position(|i| !i.boxes.is_empty()).unwrap();
    let placement = &result.state.results[inst_idx].placements[0];
    assert_eq!(placement.orient_idx, 0);
}

#[test]
fn s6_alns_improves_or_holds() {
    let container = ContainerSpec { l: 20, w: 20, h: 5, weight_max: 500 };
    let items: Vec<Item> = (0..20).map(|i| item(i, 4, 4, 1, 5, RotationPolicy::Free)).collect();

    let baseline = orchestrator::run(&items, &container, &config_without_alns()).expect("baseline run should succeed");
    let baseline_score = baseline.state.cached_score().expect("baseline state must be scored");

    let alns_config = OrchestratorConfig {
        alns: Some(AlnsParams {
            remove: RemoveAmount::Percent(20),
            repair: RepairParams { weights: AssignWeights::default(), max_time: Duration::from_millis(200), solver_workers: 2 },
            placement: default_placement(),
            stop: StopParams { max_iterations: 10, max_no_improve: 5, wall_clock_deadline: Duration::from_secs(5) },
            solver_workers: 2,
        }),
        ..config_without_alns()
    };
    let improved = orchestrator::run(&items, &container, &alns_config).expect("ALNS run should succeed");
    let improved_score = improved.state.cached_score().expect("improved state must be scored");

    assert!(improved_score <= baseline_score);
}

#[test]
fn zero_boxes_is_idempotent() {
    let container = ContainerSpec { l: 10, w: 10, h: 10, weight_max: 100 };
    let items: Vec<Item> = vec![];
    let result = orchestrator::run(&items, &container, &config_without_alns()).expect("empty input must succeed");
    assert_eq!(result.state.used_instance_count(), 0);
}

#[test]
fn item_too_big_under_any_rotation_is_assignment_infeasible() {
    let container = ContainerSpec { l: 5, w: 5, h: 5, weight_max: 100 };
    let items = vec![item(1, 10, 10, 10, 1, RotationPolicy::Free)];
    let err = orchestrator::run(&items, &container, &config_without_alns()).unwrap_err();
    match err {
        LoadError::AssignmentInfeasible { .. } => {}
        other => panic!("expected AssignmentInfeasible, got {other:?}"),
    }
}

#[test]
fn zero_weight_and_volume_item_is_still_placed() {
    let container = ContainerSpec { l: 5, w: 5, h: 5, weight_max: 100 };
    let items = vec![item(1, 1, 1, 1, 0, RotationPolicy::None)];
    let result = orchestrator::run(&items, &container, &config_without_alns()).expect("should place a zero-weight box");
    let inst_idx = result.state.instances.iter().position(|i| !i.boxes.is_empty()).unwrap();
    assert_eq!(result.state.results[inst_idx].status, Some(Status::Feasible));
}
