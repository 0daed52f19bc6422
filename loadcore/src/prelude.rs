pub use std::{
    cell::Cell,
    collections::{HashMap, HashSet},
    time::{Duration, Instant},
};
pub use thiserror::Error;

pub use crate::{
    container::ContainerSpec,
    error::LoadError,
    item::{Item, RotationPolicy, Size},
};

/// Fundamental numeric domain for this crate: dimensions, weights,
/// volumes and the objective terms derived from them. 64-bit signed
/// is wide enough for the quadratic soft-objective terms (see
/// `placement::geometry`), which is why every quantity in the system
/// is carried as this type rather than `usize`/`u32`.
pub type Num = i64;
