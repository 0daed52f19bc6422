use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use loadcore::alns::AlnsParams;
use loadcore::io::{input, output};
use loadcore::orchestrator::{self, OrchestratorConfig};

/// Packs a list of boxes into one or more shipping containers
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the input document
    #[arg(long, value_parser = clap::value_parser!(PathBuf))]
    input: PathBuf,

    /// Path the output document is written to
    #[arg(long, value_parser = clap::value_parser!(PathBuf))]
    output: PathBuf,

    /// Skip the ALNS improvement loop and report the Phase 1 + Phase 2
    /// result as-is
    #[arg(long, default_value_t = false)]
    no_alns: bool,

    /// Print per-stage progress to stderr
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Args::parse();

    let loaded = match input::load(&cli.input) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    let alns: Option<AlnsParams> = if cli.no_alns { None } else { Some(loaded.alns) };

    let config = OrchestratorConfig {
        phase1_max_time: loaded.phase1_max_time,
        assign_weights: loaded.assign_weights,
        placement: loaded.placement,
        alns,
        solver_workers: loaded.solver_workers,
        rng_seed: orchestrator::DEFAULT_SEED,
        verbose: cli.verbose,
    };

    let result = match orchestrator::run(&loaded.items, &loaded.container, &config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    let container_size = [loaded.container.l, loaded.container.w, loaded.container.h];
    let doc = output::build(&result.state, &loaded.items, container_size);

    let json = match serde_json::to_string_pretty(&doc) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("failed to serialize output: {e}");
            return ExitCode::from(3);
        }
    };
    if let Err(e) = std::fs::write(&cli.output, json) {
        eprintln!("failed to write {}: {e}", cli.output.display());
        return ExitCode::from(3);
    }

    if cli.verbose {
        eprintln!(
            "done: J={} instances considered, {} ALNS iterations, output written to {}",
            result.j_bound,
            result.alns_iterations,
            cli.output.display()
        );
    }

    ExitCode::SUCCESS
}
