//! The embedding API facade (§6): the `Engine` applications construct,
//! populate, and query. This is the seam where the five core components
//! (§2) become one coherent library: term model and unifier live in
//! `unify`, storage in `kb`, built-ins in `builtins`, the resolver itself in
//! `resolve`, and the text file format in `kbfile`.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use futures::stream::{BoxStream, StreamExt};
use tokio::sync::RwLock;

use builtins::{Builtin, BuiltinRegistry, RegistryError};
use kb::{ClauseError, KnowledgeBase};
use resolve::{ResolveConfig, ResolveContext, TraceSink};
use unify::Term;

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Clause(#[from] ClauseError),
    #[error(transparent)]
    KbFile(#[from] kbfile::KbFileError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("duplicate user-supplied built-in name `{0}` at engine construction")]
    DuplicateUserBuiltin(String),
    #[error("reading knowledge-base file: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-query overrides of the resolver's defaults. `max_solutions = None`
/// means unbounded, matching the public API's `-1` sentinel (§6).
#[derive(Clone, Debug, Default)]
pub struct QueryOptions {
    pub max_depth: Option<usize>,
    pub max_solutions: Option<usize>,
    pub occurs_check: Option<bool>,
}

impl QueryOptions {
    fn into_config(self) -> ResolveConfig {
        let default = ResolveConfig::default();
        ResolveConfig {
            max_depth: self.max_depth.unwrap_or(default.max_depth),
            max_solutions: self.max_solutions.or(default.max_solutions),
            occurs_check: self.occurs_check.unwrap_or(default.occurs_check),
        }
    }
}

/// A fully-bound solution, keyed by the user-facing variable names that
/// appeared in their query (e.g. `"?X"`).
pub type Solution = BTreeMap<String, Term>;

/// The engine. Knowledge-base mutation is guarded by a single writer lock
/// (§5 option (b)): `add_fact`/`add_rule`/`load_from_file` take a write
/// lock, and `query` takes a brief read lock only long enough to clone an
/// immutable snapshot `Arc<KnowledgeBase>` before releasing it — so mutation
/// never blocks an in-flight query's lookups, and an in-flight query never
/// observes a KB mutation that started after it.
pub struct Engine {
    kb: RwLock<KnowledgeBase>,
    builtins: Arc<BuiltinRegistry>,
    trace: RwLock<Arc<dyn TraceSink>>,
}

impl Engine {
    /// Constructs an engine with the standard built-in set, optionally
    /// overridden or extended by `builtins`. Duplicate names among `builtins`
    /// itself are a construction error; duplicates against the standard set
    /// are resolved as overrides (§4.5).
    pub fn new(user_builtins: Vec<(String, Arc<dyn Builtin>)>) -> Result<Self, EngineError> {
        let mut registry = BuiltinRegistry::standard();
        let mut seen = HashSet::new();
        for (name, handler) in user_builtins {
            if !seen.insert(name.clone()) {
                return Err(EngineError::DuplicateUserBuiltin(name));
            }
            registry.override_with(&name, handler);
        }
        Ok(Engine {
            kb: RwLock::new(KnowledgeBase::new()),
            builtins: Arc::new(registry),
            trace: RwLock::new(resolve::null_sink()),
        })
    }

    /// Sets the trace sink future queries will notify (§6's
    /// `configure_logging`; ambient log verbosity itself is the embedder's
    /// `log`/subscriber setup, outside the engine's control).
    pub async fn configure_trace_sink(&self, sink: Arc<dyn TraceSink>) {
        *self.trace.write().await = sink;
    }

    pub async fn add_fact(&self, head: Term) -> Result<(), EngineError> {
        self.kb.write().await.add_fact(head)?;
        Ok(())
    }

    pub async fn add_rule(&self, head: Term, body: Vec<Term>) -> Result<(), EngineError> {
        self.kb.write().await.add_rule(head, body)?;
        Ok(())
    }

    pub async fn load_from_file(&self, path: &std::path::Path) -> Result<(), EngineError> {
        log::info!("loading knowledge base from {}", path.display());
        let text = tokio::fs::read_to_string(path).await?;
        self.load_from_str(&text).await
    }

    pub async fn load_from_str(&self, text: &str) -> Result<(), EngineError> {
        let parsed = kbfile::parse(text)?;
        let mut guard = self.kb.write().await;
        for fact in parsed.facts {
            guard.add_fact(fact)?;
        }
        for (head, body) in parsed.rules {
            guard.add_rule(head, body)?;
        }
        log::debug!("knowledge base now holds {} clause(s)", guard.clause_count());
        Ok(())
    }

    /// Runs `goal` against a snapshot of the current knowledge base, as a
    /// lazy stream of solutions projected onto `goal`'s own variables.
    pub async fn query(&self, goal: Term, opts: QueryOptions) -> BoxStream<'static, Solution> {
        log::debug!("query {goal} (max_depth={:?}, max_solutions={:?})", opts.max_depth, opts.max_solutions);
        let snapshot = Arc::new(self.kb.read().await.clone());
        let trace = self.trace.read().await.clone();
        let ctx = Arc::new(ResolveContext::new(snapshot, self.builtins.clone(), opts.into_config()).with_trace(trace));
        let query_goal = goal.clone();
        let solutions = resolve::solve(vec![goal], unify::Substitution::new(), 0, ctx);
        Box::pin(solutions.map(move |sigma| resolve::project_solution(&query_goal, &sigma)))
    }

    pub async fn query_one(&self, goal: Term, opts: QueryOptions) -> Option<Solution> {
        let mut stream = self
            .query(goal, QueryOptions { max_solutions: Some(1), ..opts })
            .await;
        stream.next().await
    }

    pub async fn exists(&self, goal: Term, opts: QueryOptions) -> bool {
        self.query_one(goal, opts).await.is_some()
    }
}
