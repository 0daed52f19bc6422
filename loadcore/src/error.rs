use thiserror::Error;

/// The taxonomy this crate reports failures through. Variants map
/// directly onto the process exit codes of the `pack3d` binary:
/// `InputMalformed` -> 1, `AssignmentInfeasible` -> 2, everything else
/// that reaches `main` as an `Err` -> 3.
///
/// `PlacementUnfeasible` and `SolverTimeout` are not fatal on their own
/// — they are recorded as container statuses, and only escalate to a
/// process-level error if the orchestrator has no other recourse (e.g.
/// the final best-state re-evaluation still comes back unfeasible).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("malformed input: {0}")]
    InputMalformed(String),

    #[error("assignment infeasible: {reason}")]
    AssignmentInfeasible { reason: String },

    #[error("placement infeasible for container {container}: {reason}")]
    PlacementUnfeasible { container: usize, reason: String },

    #[error("solver timed out without a usable incumbent ({context})")]
    SolverTimeout { context: String },

    #[error("solver internal error: {0}")]
    SolverInternal(String),
}

impl LoadError {
    /// Process exit code per the CLI surface's contract.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::InputMalformed(_) => 1,
            LoadError::AssignmentInfeasible { .. } => 2,
            LoadError::PlacementUnfeasible { .. } => 3,
            LoadError::SolverTimeout { .. } => 3,
            LoadError::SolverInternal(_) => 3,
        }
    }
}
