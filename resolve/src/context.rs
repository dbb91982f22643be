use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use builtins::BuiltinRegistry;
use kb::KnowledgeBase;
use unify::{Term, VarName};

use crate::trace::{null_sink, TraceSink};

/// Per-query knobs (§4.4, §6): depth bound, solution cap, and the
/// occurs-check opt-in left open by §3/§9.
#[derive(Clone, Debug)]
pub struct ResolveConfig {
    pub max_depth: usize,
    /// `None` means unbounded (the public API's `max_solutions = -1`).
    pub max_solutions: Option<usize>,
    pub occurs_check: bool,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        ResolveConfig { max_depth: 25, max_solutions: None, occurs_check: false }
    }
}

/// Everything one `solve` call tree needs: the knowledge base and built-in
/// registry it reads from, its own fresh-variable counter, and its own
/// solution-cap counter. A `ResolveContext` is created once per query and
/// shared (via `Arc`) across every recursive `solve` frame of that query —
/// never across queries, per §5's "the fresh-variable counter is per-query".
pub struct ResolveContext {
    pub kb: Arc<KnowledgeBase>,
    pub builtins: Arc<BuiltinRegistry>,
    pub config: ResolveConfig,
    pub trace: Arc<dyn TraceSink>,
    fresh_counter: AtomicU64,
    solutions_emitted: AtomicUsize,
}

impl ResolveContext {
    pub fn new(kb: Arc<KnowledgeBase>, builtins: Arc<BuiltinRegistry>, config: ResolveConfig) -> Self {
        ResolveContext {
            kb,
            builtins,
            config,
            trace: null_sink(),
            fresh_counter: AtomicU64::new(0),
            solutions_emitted: AtomicUsize::new(0),
        }
    }

    pub fn with_trace(mut self, trace: Arc<dyn TraceSink>) -> Self {
        self.trace = trace;
        self
    }

    /// A fresh variable name disjoint from any user-supplied or
    /// previously-minted name for the life of this query: `"<old>#<n>"` with
    /// a monotonically increasing `n`.
    pub fn fresh_var(&self, old: &VarName) -> Term {
        let n = self.fresh_counter.fetch_add(1, Ordering::Relaxed);
        Term::var(format!("{old}#{n}"))
    }

    pub fn reached_cap(&self) -> bool {
        match self.config.max_solutions {
            Some(cap) => self.solutions_emitted.load(Ordering::Relaxed) >= cap,
            None => false,
        }
    }

    /// Records one solution reaching the base case. Must only be called
    /// after confirming `!reached_cap()`, and immediately before yielding it.
    pub fn record_solution(&self) {
        self.solutions_emitted.fetch_add(1, Ordering::Relaxed);
    }
}
