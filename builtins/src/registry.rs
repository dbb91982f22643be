use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::BoxStream;
use unify::{Substitution, Term};

use crate::solver::Solver;
use crate::standard;

/// A pluggable built-in predicate: given the goal's arguments (already
/// `walk_compound`-resolved against the caller's substitution) and a handle
/// back into the resolver, produces a lazy sequence of extended
/// substitutions. An empty stream signals failure — handlers must not panic
/// or return `Err` to mean "no solution" (§7 item 5 vs item 6).
pub trait Builtin: Send + Sync {
    /// The fixed argument count this built-in requires, or `None` for a
    /// variadic one (only `or` is variadic). The resolver checks this
    /// against the goal's actual arity before calling `invoke`, so
    /// `invoke` itself may index `args` unconditionally.
    fn arity(&self) -> Option<usize> {
        None
    }

    fn invoke(
        &self,
        args: Vec<Term>,
        sigma: Substitution,
        solver: Arc<dyn Solver>,
    ) -> BoxStream<'static, Substitution>;
}

#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("built-in `{0}` is already registered")]
    DuplicateName(String),
}

/// Name → handler. Once a name is registered here it shadows any knowledge
/// base clauses of the same name; the resolver checks this registry first.
#[derive(Clone, Default)]
pub struct BuiltinRegistry {
    handlers: HashMap<String, Arc<dyn Builtin>>,
}

impl BuiltinRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The fixed standard set (§4.5): `eq`, `neq`, `gt`/`gte`/`lt`/`lte`,
    /// `member`, `or`, `http_get_json`, `unify_json_path`.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        standard::register_all(&mut registry).expect("standard built-in names are distinct");
        registry
    }

    pub fn register(&mut self, name: &str, handler: Arc<dyn Builtin>) -> Result<(), RegistryError> {
        if self.handlers.contains_key(name) {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }
        self.handlers.insert(name.to_string(), handler);
        Ok(())
    }

    /// Registers `handler` under `name`, replacing any existing registration.
    /// Used for user overrides of the standard set (§4.5: "user overrides
    /// MUST be resolvable at engine construction time").
    pub fn override_with(&mut self, name: &str, handler: Arc<dyn Builtin>) {
        self.handlers.insert(name.to_string(), handler);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Builtin>> {
        self.handlers.get(name).cloned()
    }

    /// Looks up `name` and checks `arg_count` against its fixed arity (if
    /// any) in one step. A mismatch is reported the same way an unknown
    /// predicate is: `None`, for the caller to treat as silent failure
    /// rather than index out of bounds inside `invoke`.
    pub fn get_for_arity(&self, name: &str, arg_count: usize) -> Option<Arc<dyn Builtin>> {
        let handler = self.get(name)?;
        match handler.arity() {
            Some(expected) if expected != arg_count => None,
            _ => Some(handler),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }
}
