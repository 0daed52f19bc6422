//! External-interface collaborators: JSON input/output per §6. Parsing
//! and serialization are the only places this crate touches `serde`.

pub mod input;
pub mod output;
