//! Builds and solves the per-container Phase 2 placement problem: pick
//! one orientation and an integer corner for every box assigned to a
//! container, honoring in-bounds, non-overlap and no-floating support,
//! while maximizing a weighted sum of placement-quality terms.
//!
//! Unlike [`crate::assign`], this does not route through the generic
//! [`crate::model::Model`] — positions are inherently geometric, and
//! checking non-overlap/support directly against coordinates is both
//! cheaper and clearer than flattening it into generic linear
//! inequalities. `PMB` and its solving engine live together in this
//! module; both still report through the shared [`crate::model::Status`]
//! vocabulary.

pub mod geometry;

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::model::Status;
use crate::prelude::*;
use geometry::{candidate_corners, candidate_is_legal, has_support, Placed};

const MAX_LIVES: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymmetryMode {
    Full,
    Simple,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorMode {
    Larger,
    HeavierWithinMostRecurringSimilar,
    None,
}

/// One non-negative weight per soft term in the placement objective
/// table; zero disables the term.
#[derive(Debug, Clone, Copy)]
pub struct PlacementWeights {
    pub floor_area: Num,
    pub large_base_lower_linear: Num,
    pub large_base_lower_quadratic: Num,
    pub volume_lower: Num,
    pub surface_contact: Num,
    pub biggest_face_down: Num,
}

impl Default for PlacementWeights {
    fn default() -> Self {
        Self {
            floor_area: 1,
            large_base_lower_linear: 1,
            large_base_lower_quadratic: 0,
            volume_lower: 1,
            surface_contact: 1,
            biggest_face_down: 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlacementSettings {
    pub symmetry_mode: SymmetryMode,
    pub anchor_mode: AnchorMode,
    pub weights: PlacementWeights,
    pub max_time: Duration,
}

/// One box's solved orientation and corner, relative to its container's
/// own origin.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    pub item_index: usize,
    pub orient_idx: u8,
    pub pos: (Num, Num, Num),
    pub size: Size,
}

pub struct PlacementResult {
    pub status: Status,
    pub placements: Vec<Placement>,
}

/// Runs PMB + its engine for one container's worth of boxes (given as
/// absolute indices into the shared item list).
pub fn solve(
    items: &[Item],
    indices: &[usize],
    container: &ContainerSpec,
    settings: &PlacementSettings,
    seed: u64,
    workers: usize,
) -> PlacementResult {
    if indices.is_empty() {
        return PlacementResult { status: Status::Optimal, placements: vec![] };
    }

    let csize = container.size();
    if indices.iter().any(|&i| !items[i].can_fit_in(csize)) {
        return PlacementResult { status: Status::Infeasible, placements: vec![] };
    }

    let anchor = anchor_item(items, indices, settings.anchor_mode);
    let start = Instant::now();
    let deadline = start + settings.max_time;
    let workers = workers.max(1);
    let seeds: Vec<u64> =
        (0..workers).map(|i| seed.wrapping_add((i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))).collect();

    let attempts: Vec<Option<Vec<Placement>>> = seeds
        .into_par_iter()
        .map(|s| {
            let mut rng = StdRng::seed_from_u64(s);
            run_attempts(items, indices, container, anchor, deadline, &mut rng)
        })
        .collect();

    let mut best: Option<(Num, Vec<Placement>)> = None;
    for attempt in attempts.into_iter().flatten() {
        let score = soft_score(container, &attempt, items, &settings.weights);
        if best.as_ref().is_none_or(|(b, _)| score > *b) {
            best = Some((score, attempt));
        }
    }

    match best {
        Some((_, placements)) => PlacementResult { status: Status::Feasible, placements },
        None => PlacementResult { status: Status::Unknown, placements: vec![] },
    }
}

/// Boxes sorted by decreasing nominal volume, the "big rocks first"
/// ordering: settle the boxes least likely to find a later home before
/// the small ones that can fill whatever gaps remain.
fn base_order(items: &[Item], indices: &[usize]) -> Vec<usize> {
    let mut order = indices.to_vec();
    order.sort_by(|&a, &b| items[b].volume().cmp(&items[a].volume()));
    order
}

fn perturb_order(order: &mut [usize], rng: &mut StdRng) {
    if order.len() < 2 {
        return;
    }
    let i = rng.gen_range(0..order.len());
    let j = rng.gen_range(0..order.len());
    order.swap(i, j);
}

/// Retries construction from a perturbed order whenever the current one
/// gets stuck, up to `MAX_LIVES` consecutive failures or the deadline —
/// the same give-up discipline the generic model solver uses.
fn run_attempts(
    items: &[Item],
    indices: &[usize],
    container: &ContainerSpec,
    anchor: Option<usize>,
    deadline: Instant,
    rng: &mut StdRng,
) -> Option<Vec<Placement>> {
    let mut order = base_order(items, indices);
    let mut lives = MAX_LIVES;
    loop {
        if let Some(result) = construct(&order, anchor, items, container) {
            return Some(result);
        }
        if Instant::now() >= deadline || lives == 0 {
            return None;
        }
        perturb_order(&mut order, rng);
        lives -= 1;
    }
}

/// One deterministic greedy construction pass: place the anchor (if
/// any) at the origin, then visit `order` and commit each box to the
/// first legal, supported candidate corner, scanned floor-first.
fn construct(order: &[usize], anchor: Option<usize>, items: &[Item], container: &ContainerSpec) -> Option<Vec<Placement>> {
    let csize = container.size();
    let mut placed: Vec<Placed> = Vec::with_capacity(order.len());
    let mut placements: Vec<Placement> = Vec::with_capacity(order.len());

    let sequence: Vec<usize> = match anchor {
        Some(a) => std::iter::once(a).chain(order.iter().copied().filter(|&i| i != a)).collect(),
        None => order.to_vec(),
    };

    for idx in sequence {
        let item = &items[idx];
        let mut committed = false;

        if Some(idx) == anchor {
            for (orient_idx, size) in item.orientations() {
                if candidate_is_legal((0, 0, 0), size, csize, &placed) {
                    placed.push(Placed { pos: (0, 0, 0), size, orient_idx });
                    placements.push(Placement { item_index: idx, orient_idx, pos: (0, 0, 0), size });
                    committed = true;
                    break;
                }
            }
        } else {
            let corners = candidate_corners(&placed);
            'corners: for corner in corners {
                for (orient_idx, size) in item.orientations() {
                    if !candidate_is_legal(corner, size, csize, &placed) {
                        continue;
                    }
                    let probe = Placed { pos: corner, size, orient_idx };
                    if has_support(&probe, &placed) {
                        placed.push(probe);
                        placements.push(Placement { item_index: idx, orient_idx, pos: corner, size });
                        committed = true;
                        break 'corners;
                    }
                }
            }
        }

        if !committed {
            return None;
        }
    }

    Some(placements)
}

/// Picks the box to pin at the origin per §4.2's two anchor policies,
/// both tie-broken by ascending input order.
fn anchor_item(items: &[Item], indices: &[usize], mode: AnchorMode) -> Option<usize> {
    match mode {
        AnchorMode::None => None,
        AnchorMode::Larger => {
            let mut best: Option<usize> = None;
            for &idx in indices {
                let v = items[idx].volume();
                if best.is_none_or(|b| v > items[b].volume()) {
                    best = Some(idx);
                }
            }
            best
        }
        AnchorMode::HeavierWithinMostRecurringSimilar => {
            let mut classes: IndexMap<Size, Vec<usize>> = IndexMap::new();
            for &idx in indices {
                classes.entry(items[idx].size).or_default().push(idx);
            }
            let members = classes.values().max_by_key(|m| m.len())?;
            let mut best: Option<usize> = None;
            for &idx in members {
                let w = items[idx].weight;
                if best.is_none_or(|b| w > items[b].weight) {
                    best = Some(idx);
                }
            }
            best
        }
    }
}

/// Soft objective from §4.2's term table, evaluated directly over the
/// committed corners rather than via auxiliary CP multiplication
/// variables — both compute the same integer products, this module
/// just has no solver in between to hand them to.
fn soft_score(container: &ContainerSpec, placements: &[Placement], items: &[Item], weights: &PlacementWeights) -> Num {
    let h = container.h;
    let placed: Vec<Placed> =
        placements.iter().map(|p| Placed { pos: p.pos, size: p.size, orient_idx: p.orient_idx }).collect();

    let mut score: Num = 0;
    for (i, p) in placements.iter().enumerate() {
        let pi = &placed[i];
        let base_area = pi.base_area();
        let rise = h - p.pos.2;

        if p.pos.2 == 0 {
            score += weights.floor_area * base_area;
        }
        score += weights.large_base_lower_linear * rise * base_area;
        score += weights.large_base_lower_quadratic * rise * rise * base_area;
        score += weights.volume_lower * rise * items[p.item_index].volume();

        if items[p.item_index].rotation == RotationPolicy::Free {
            let nominal = items[p.item_index].size;
            let faces = [nominal.l * nominal.w, nominal.l * nominal.h, nominal.w * nominal.h];
            let max_face = *faces.iter().max().expect("three faces always present");
            if base_area == max_face {
                score += weights.biggest_face_down;
            }
        }
    }

    for (i, pi) in placed.iter().enumerate() {
        for (j, pj) in placed.iter().enumerate() {
            if i == j {
                continue;
            }
            if geometry::supports(pi, pj) {
                score += weights.surface_contact * geometry::xy_overlap_area(pi, pj);
            }
        }
    }

    score
}
