use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use loadcore::io::input;
use loadcore::orchestrator::{self, OrchestratorConfig};

/// Compares a plain Phase 1 + Phase 2 run against the ALNS-improved
/// run across a handful of RNG seeds
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to input
    #[arg(long, value_parser = clap::value_parser!(PathBuf))]
    input: PathBuf,

    /// Number of distinct seeds to try
    #[arg(short, long, default_value_t = 5)]
    trials: u32,
}

fn main() {
    let cli = Args::parse();
    assert!(cli.input.exists() && cli.input.is_file(), "Invalid input path");

    let loaded = input::load(&cli.input).expect("failed to parse input document");

    let mut no_alns_best = i64::MAX;
    let mut alns_best = i64::MAX;
    let mut alns_total_iters = 0u64;
    let total = Instant::now();

    for trial in 0..cli.trials {
        let seed = orchestrator::DEFAULT_SEED.wrapping_add(trial as u64);

        let baseline_config = OrchestratorConfig {
            phase1_max_time: loaded.phase1_max_time,
            assign_weights: loaded.assign_weights,
            placement: loaded.placement,
            alns: None,
            solver_workers: loaded.solver_workers,
            rng_seed: seed,
            verbose: false,
        };
        if let Ok(result) = orchestrator::run(&loaded.items, &loaded.container, &baseline_config) {
            if let Some(score) = result.state.cached_score() {
                no_alns_best = no_alns_best.min(score);
            }
        }

        let improved_config = OrchestratorConfig {
            phase1_max_time: loaded.phase1_max_time,
            assign_weights: loaded.assign_weights,
            placement: loaded.placement,
            alns: Some(clone_alns(&loaded.alns)),
            solver_workers: loaded.solver_workers,
            rng_seed: seed,
            verbose: false,
        };
        if let Ok(result) = orchestrator::run(&loaded.items, &loaded.container, &improved_config) {
            if let Some(score) = result.state.cached_score() {
                alns_best = alns_best.min(score);
            }
            alns_total_iters += result.alns_iterations;
        }
    }

    println!("Total bench time: {} ms", total.elapsed().as_millis());
    println!("Best score without ALNS:\t{no_alns_best}");
    println!("Best score with ALNS:\t\t{alns_best}");
    println!("Average ALNS iterations/trial:\t{}", alns_total_iters / cli.trials.max(1) as u64);
}

/// `AlnsParams` is consumed by a run, so a bench over several seeds
/// needs its own copy per trial rather than moving the loaded one.
fn clone_alns(params: &loadcore::alns::AlnsParams) -> loadcore::alns::AlnsParams {
    loadcore::alns::AlnsParams {
        remove: params.remove,
        repair: loadcore::alns::repair::RepairParams {
            weights: params.repair.weights,
            max_time: params.repair.max_time,
            solver_workers: params.repair.solver_workers,
        },
        placement: params.placement,
        stop: params.stop,
        solver_workers: params.solver_workers,
    }
}
