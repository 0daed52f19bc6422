//! `SD` for the generic [`super::Model`]: a deadline-bounded,
//! hint-seeded local-search engine. There is no branch-and-bound here —
//! repair moves are accepted greedily against a violation count first,
//! objective value second, and the search restarts from the incumbent
//! whenever it goes `max_lives` moves without improving, the same
//! "give up and keep the best you found" discipline the idealloc binary
//! exposes through its `--max-lives` flag.
//!
//! Multiple independent runs are fanned out over a rayon pool (seeded
//! deterministically from one `u64`) and the best incumbent wins; this
//! is the "parallelism lives inside the SD" contract the outer ALNS
//! loop relies on.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::{Model, Status};
use crate::prelude::*;

const MAX_LIVES: u32 = 4_000;

#[derive(Debug, Clone)]
pub struct Solution {
    pub status: Status,
    pub values: Vec<Num>,
    pub objective: Num,
    pub elapsed: Duration,
}

/// One local-search attempt from `start` until `deadline` or `MAX_LIVES`
/// consecutive non-improving moves, whichever comes first.
fn run_single(model: &Model, hint: Option<&[Num]>, deadline: Instant, rng: &mut StdRng) -> Solution {
    let run_start = Instant::now();

    if model.num_vars() == 0 {
        return Solution {
            status: Status::Optimal,
            values: vec![],
            objective: model.objective.constant,
            elapsed: run_start.elapsed(),
        };
    }

    let mut current: Vec<Num> = match hint {
        Some(h) if h.len() == model.num_vars() => h.to_vec(),
        _ => model.domains.iter().map(|d| d.lo).collect(),
    };
    let mut current_violation = model.total_violation(&current);

    let mut best = current.clone();
    let mut best_violation = current_violation;
    let mut best_objective = model.objective_value(&current);

    let mut lives = MAX_LIVES;

    while Instant::now() < deadline && lives > 0 {
        let vi = rng.gen_range(0..model.num_vars());
        let d = model.domains[vi];
        if d.lo == d.hi {
            lives -= 1;
            continue;
        }
        let old = current[vi];
        let new_val = d.lo + rng.gen_range(0..=(d.hi - d.lo));
        if new_val == old {
            continue;
        }

        current[vi] = new_val;
        let new_violation = model.total_violation(&current);

        let accept = match (new_violation.cmp(&current_violation), new_violation == 0) {
            (std::cmp::Ordering::Less, _) => true,
            (std::cmp::Ordering::Equal, true) => {
                let new_obj = model.objective_value(&current);
                if model.minimize { new_obj < best_objective } else { new_obj > best_objective }
            }
            _ => false,
        };

        if !accept {
            current[vi] = old;
            lives -= 1;
            continue;
        }
        current_violation = new_violation;

        if current_violation == 0 {
            let obj = model.objective_value(&current);
            let improved = best_violation != 0
                || if model.minimize { obj < best_objective } else { obj > best_objective };
            if improved {
                best = current.clone();
                best_violation = 0;
                best_objective = obj;
                lives = MAX_LIVES;
            } else {
                lives -= 1;
            }
        } else {
            lives -= 1;
        }
    }

    let status = if best_violation == 0 { Status::Feasible } else { Status::Unknown };
    Solution { status, values: best, objective: best_objective, elapsed: run_start.elapsed() }
}

/// Runs `workers` independent local-search attempts in parallel and
/// returns the best. `seed` makes the whole call deterministic:
/// reduction picks the unique best by `(status, objective)`, never by
/// which worker happened to finish first.
pub fn solve(model: &Model, deadline_in: Duration, hint: Option<&[Num]>, seed: u64, workers: usize) -> Solution {
    let start = Instant::now();
    let deadline = start + deadline_in;
    let workers = workers.max(1);

    if model.num_vars() == 0 {
        return run_single(model, hint, deadline, &mut StdRng::seed_from_u64(seed));
    }

    let seeds: Vec<u64> =
        (0..workers).map(|i| seed.wrapping_add((i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))).collect();

    let solutions: Vec<Solution> = seeds
        .into_par_iter()
        .map(|s| {
            let mut rng = StdRng::seed_from_u64(s);
            run_single(model, hint, deadline, &mut rng)
        })
        .collect();

    pick_best(solutions, model.minimize, start.elapsed())
}

fn pick_best(solutions: Vec<Solution>, minimize: bool, total_elapsed: Duration) -> Solution {
    let mut iter = solutions.into_iter();
    let mut best = iter.next().expect("at least one worker always runs");
    for candidate in iter {
        let candidate_better = match (candidate.status.has_incumbent(), best.status.has_incumbent()) {
            (true, false) => true,
            (false, true) => false,
            (true, true) => {
                if minimize {
                    candidate.objective < best.objective
                } else {
                    candidate.objective > best.objective
                }
            }
            (false, false) => false,
        };
        if candidate_better {
            best = candidate;
        }
    }
    best.elapsed = total_elapsed;
    best
}
