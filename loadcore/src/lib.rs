//! Welcome to `loadcore`!
//!
//! This crate packs a list of boxes into one or more identical
//! shipping containers. It is split into the same three tightly
//! coupled subsystems that do all the hard work:
//!
//! 1. [`assign`] — Phase 1, deciding which container instance each box
//!    goes to under weight and volume capacity, with soft penalties for
//!    splitting a group across instances and for leaving instances
//!    volumetrically lopsided.
//! 2. [`placement`] — Phase 2, deciding one rotation and one integer
//!    3-D corner per box within a single container, subject to
//!    in-bounds, non-overlap and no-floating support.
//! 3. [`alns`] — an adaptive large-neighborhood search that repeatedly
//!    unassigns a random slice of boxes, re-solves Phase 1 with
//!    everything else pinned, re-scores via Phase 2, and keeps the
//!    result only if it's no worse.
//!
//! [`orchestrator`] wires these three together into one run; [`io`]
//! is the only place this crate talks to the filesystem or JSON.

pub mod alns;
pub mod assign;
pub mod container;
pub mod error;
pub mod evaluator;
pub mod io;
pub mod item;
pub mod model;
pub mod orchestrator;
pub mod placement;
pub mod prelude;
pub mod state;

pub use crate::container::ContainerSpec;
pub use crate::error::LoadError;
pub use crate::item::{Item, RotationPolicy, Size};
pub use crate::orchestrator::{OrchestratorConfig, OrchestratorOutput};
