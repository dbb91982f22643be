//! The resolver (component C4, §4.4): the engine's integrator, consulting
//! the knowledge base and unifier and dispatching to built-ins.

mod context;
mod engine;
mod rename;
mod query;
mod trace;

pub use context::{ResolveConfig, ResolveContext};
pub use engine::solve;
pub use query::{project_solution, variables_in};
pub use trace::{null_sink, LogTraceSink, NullTraceSink, TraceEvent, TraceSink};
