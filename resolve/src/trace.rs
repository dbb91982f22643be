//! Observational trace events (§6): CALL/EXIT/FAIL/REDO. These are sinks the
//! resolver notifies as it works; they never influence the solution stream,
//! which is why this is a distinct, engine-scoped interface rather than
//! routed through the ambient `log` crate (a trace consumer wants structured
//! per-query events, not formatted log lines, and a global `log` logger
//! would force every embedded engine instance to share one sink).

use std::fmt;
use std::sync::Arc;

use unify::{Substitution, Term};

#[derive(Clone, Debug)]
pub enum TraceEvent {
    Call { goal: Term, depth: usize },
    Exit { goal: Term, sigma_display: String },
    Fail { goal: Term },
    Redo { goal: Term },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Call { goal, depth } => write!(f, "CALL {goal} (depth {depth})"),
            TraceEvent::Exit { goal, sigma_display } => write!(f, "EXIT {goal} / {sigma_display}"),
            TraceEvent::Fail { goal } => write!(f, "FAIL {goal}"),
            TraceEvent::Redo { goal } => write!(f, "REDO {goal}"),
        }
    }
}

pub trait TraceSink: Send + Sync {
    fn emit(&self, event: TraceEvent);
}

/// The default sink: discards every event. Tracing has a real per-event cost
/// (cloning goals, formatting substitutions) that most queries should not pay.
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&self, _event: TraceEvent) {}
}

/// Forwards events to the ambient `log` crate at `trace!` level, formatted
/// via `TraceEvent`'s `Display`. A convenience bridge for embedders who just
/// want trace output in their existing log stream rather than a dedicated
/// sink.
pub struct LogTraceSink;

impl TraceSink for LogTraceSink {
    fn emit(&self, event: TraceEvent) {
        log::trace!("{event}");
    }
}

pub fn null_sink() -> Arc<dyn TraceSink> {
    Arc::new(NullTraceSink)
}

pub(crate) fn render_sigma(goal: &Term, sigma: &Substitution) -> String {
    unify::deep_walk(goal, sigma).to_string()
}
