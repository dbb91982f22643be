//! Pluggable built-in predicate registry (component C5, §4.5).

mod json_term;
mod registry;
mod solver;
mod standard;

pub use json_term::{from_value as json_from_value, path_get as json_path_get};
pub use registry::{Builtin, BuiltinRegistry, RegistryError};
pub use solver::Solver;
