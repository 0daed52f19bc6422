//! Parses the two JSON documents §6 defines (the main input document
//! and the Phase-2 settings document it references by path) into the
//! crate's internal types. This is the only place `serde_json` touches
//! the crate — everything past [`load`] works with plain Rust values.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::alns::{destroy::RemoveAmount, repair::RepairParams, AlnsParams};
use crate::assign::AssignWeights;
use crate::container::ContainerSpec;
use crate::error::LoadError;
use crate::item::{Item, RotationPolicy, Size};
use crate::placement::{AnchorMode, PlacementSettings, PlacementWeights, SymmetryMode};
use crate::prelude::Num;

#[derive(Debug, Deserialize)]
struct ContainerDoc {
    size: [Num; 3],
    weight: Num,
}

#[derive(Debug, Deserialize)]
struct ItemDoc {
    id: i64,
    size: [Num; 3],
    weight: Num,
    rotation: RotationPolicy,
    #[serde(default)]
    group_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct AlnsParamsDoc {
    num_iterations: u64,
    num_can_be_moved_percentage: u8,
    time_limit: f64,
    max_no_improve: u64,
}

#[derive(Debug, Deserialize)]
struct InputDoc {
    container: ContainerDoc,
    items: Vec<ItemDoc>,
    solver_phase1_max_time_in_seconds: f64,
    step2_settings_file: String,
    alns_params: AlnsParamsDoc,
    /// Not part of §6's literal field list; §4.1 calls both weights
    /// "externally configurable" and this is the document that
    /// externally configures everything else, so they land here too.
    #[serde(default = "default_lambda")]
    lambda_group: Num,
    #[serde(default = "default_lambda")]
    lambda_balance: Num,
}

fn default_lambda() -> Num {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
enum AnchorModeDoc {
    Larger,
    HeavierWithinMostRecurringSimilar,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SymmetryModeDoc {
    Full,
    Simple,
    None,
}

#[derive(Debug, Deserialize)]
struct Phase2SettingsDoc {
    symmetry_mode: SymmetryModeDoc,
    solver_phase2_max_time_in_seconds: f64,
    #[serde(default)]
    anchor_mode: Option<AnchorModeDoc>,
    #[serde(default)]
    prefer_floor_area_weight: Num,
    #[serde(default)]
    prefer_large_base_lower_weight: Num,
    #[serde(default)]
    prefer_large_base_lower_quadratic_weight: Num,
    #[serde(default)]
    prefer_volume_lower_weight: Num,
    #[serde(default)]
    prefer_surface_contact_weight: Num,
    #[serde(default)]
    prefer_biggest_face_down_weight: Num,
}

pub struct LoadedInput {
    pub items: Vec<Item>,
    pub container: ContainerSpec,
    pub phase1_max_time: std::time::Duration,
    pub assign_weights: AssignWeights,
    pub placement: PlacementSettings,
    pub alns: AlnsParams,
    pub solver_workers: usize,
}

fn seconds(s: f64) -> std::time::Duration {
    std::time::Duration::from_secs_f64(s.max(0.0))
}

/// Reads the main input document at `path`, then follows
/// `step2_settings_file` (resolved relative to `path`'s own directory
/// when it is not already absolute) to load the Phase-2 settings.
pub fn load(path: &Path) -> Result<LoadedInput, LoadError> {
    let raw = fs::read_to_string(path).map_err(|e| LoadError::InputMalformed(format!("cannot read {}: {e}", path.display())))?;
    let doc: InputDoc = serde_json::from_str(&raw).map_err(|e| LoadError::InputMalformed(format!("malformed input document: {e}")))?;

    let step2_path = Path::new(&doc.step2_settings_file);
    let resolved_step2 = if step2_path.is_absolute() {
        step2_path.to_path_buf()
    } else {
        path.parent().map(|p| p.join(step2_path)).unwrap_or_else(|| step2_path.to_path_buf())
    };
    let step2_raw = fs::read_to_string(&resolved_step2)
        .map_err(|e| LoadError::InputMalformed(format!("cannot read {}: {e}", resolved_step2.display())))?;
    let step2: Phase2SettingsDoc = serde_json::from_str(&step2_raw)
        .map_err(|e| LoadError::InputMalformed(format!("malformed phase-2 settings document: {e}")))?;

    if doc.container.size.iter().any(|&v| v <= 0) || doc.container.weight <= 0 {
        return Err(LoadError::InputMalformed("container dimensions and weight capacity must be positive".to_string()));
    }
    for item in &doc.items {
        if item.size.iter().any(|&v| v <= 0) {
            return Err(LoadError::InputMalformed(format!("item id {} has a non-positive dimension", item.id)));
        }
        if item.weight < 0 {
            return Err(LoadError::InputMalformed(format!("item id {} has negative weight", item.id)));
        }
    }

    let container = ContainerSpec { l: doc.container.size[0], w: doc.container.size[1], h: doc.container.size[2], weight_max: doc.container.weight };

    let items: Vec<Item> = doc
        .items
        .into_iter()
        .map(|i| Item { id: i.id, size: Size::new(i.size[0], i.size[1], i.size[2]), weight: i.weight, rotation: i.rotation, group: i.group_id })
        .collect();

    let anchor_mode = match step2.anchor_mode {
        None => AnchorMode::None,
        Some(AnchorModeDoc::Larger) => AnchorMode::Larger,
        Some(AnchorModeDoc::HeavierWithinMostRecurringSimilar) => AnchorMode::HeavierWithinMostRecurringSimilar,
    };
    let symmetry_mode = match step2.symmetry_mode {
        SymmetryModeDoc::Full => SymmetryMode::Full,
        SymmetryModeDoc::Simple => SymmetryMode::Simple,
        SymmetryModeDoc::None => SymmetryMode::None,
    };

    let placement = PlacementSettings {
        symmetry_mode,
        anchor_mode,
        weights: PlacementWeights {
            floor_area: step2.prefer_floor_area_weight,
            large_base_lower_linear: step2.prefer_large_base_lower_weight,
            large_base_lower_quadratic: step2.prefer_large_base_lower_quadratic_weight,
            volume_lower: step2.prefer_volume_lower_weight,
            surface_contact: step2.prefer_surface_contact_weight,
            biggest_face_down: step2.prefer_biggest_face_down_weight,
        },
        max_time: seconds(step2.solver_phase2_max_time_in_seconds),
    };

    let assign_weights = AssignWeights { lambda_group: doc.lambda_group, lambda_balance: doc.lambda_balance };

    const DEFAULT_SOLVER_WORKERS: usize = 4;
    let alns = AlnsParams {
        remove: RemoveAmount::Percent(doc.alns_params.num_can_be_moved_percentage),
        repair: RepairParams {
            weights: assign_weights,
            max_time: seconds(doc.solver_phase1_max_time_in_seconds),
            solver_workers: DEFAULT_SOLVER_WORKERS,
        },
        placement,
        stop: crate::alns::stop::StopParams {
            max_iterations: doc.alns_params.num_iterations,
            max_no_improve: doc.alns_params.max_no_improve,
            wall_clock_deadline: seconds(doc.alns_params.time_limit),
        },
        solver_workers: DEFAULT_SOLVER_WORKERS,
    };

    Ok(LoadedInput {
        items,
        container,
        phase1_max_time: seconds(doc.solver_phase1_max_time_in_seconds),
        assign_weights,
        placement,
        alns,
        solver_workers: DEFAULT_SOLVER_WORKERS,
    })
}
