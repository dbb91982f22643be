//! Knowledge base (component C3, §4.3): indexed storage of facts and rules
//! by predicate name/arity, in insertion order.

use std::collections::HashMap;
use std::sync::Arc;

use lasso::Spur;
use unify::Term;

/// A fact or rule. Facts are represented uniformly as clauses with an empty
/// body (§3): `Clause { head, body: vec![] }`.
#[derive(Clone, Debug)]
pub struct Clause {
    pub head: Term,
    pub body: Vec<Term>,
}

impl Clause {
    pub fn fact(head: Term) -> Self {
        Clause { head, body: Vec::new() }
    }

    pub fn rule(head: Term, body: Vec<Term>) -> Self {
        Clause { head, body }
    }

    pub fn is_fact(&self) -> bool {
        self.body.is_empty()
    }
}

/// A malformed clause rejected at insertion time (§7 error category 4).
#[derive(thiserror::Error, Debug)]
pub enum ClauseError {
    #[error("clause head must be a compound term, got {0}")]
    NonCompoundHead(String),
    #[error("clause body goal must be a compound term, got {0}")]
    NonCompoundBodyGoal(String),
}

type PredicateKey = (Spur, usize);

/// A mapping from predicate key `(name, arity)` to an ordered list of
/// clauses. Insertion order is preserved and significant: the resolver
/// tries clauses in the order they were added.
#[derive(Default, Debug, Clone)]
pub struct KnowledgeBase {
    clauses: HashMap<PredicateKey, Vec<Arc<Clause>>>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fact (a clause with an empty body) to the bucket for
    /// `head`'s predicate name and arity.
    pub fn add_fact(&mut self, head: Term) -> Result<(), ClauseError> {
        self.add_rule(head, Vec::new())
    }

    /// Validates that `head` is a Compound, then appends `Clause { head,
    /// body }` to the `(name, arity)` bucket the head belongs to.
    pub fn add_rule(&mut self, head: Term, body: Vec<Term>) -> Result<(), ClauseError> {
        if !matches!(head, Term::Compound(_)) {
            return Err(ClauseError::NonCompoundHead(head.to_string()));
        }
        for goal in &body {
            if !matches!(goal, Term::Compound(_)) {
                return Err(ClauseError::NonCompoundBodyGoal(goal.to_string()));
            }
        }
        let key = head.predicate_key();
        self.clauses
            .entry(key)
            .or_default()
            .push(Arc::new(Clause::rule(head, body)));
        Ok(())
    }

    /// Clauses registered under `(name, arity)`, in insertion order. Returns
    /// an empty slice for an unknown predicate (§7: unknown predicates fail
    /// silently rather than erroring).
    pub fn clauses_for(&self, name: Spur, arity: usize) -> &[Arc<Clause>] {
        self.clauses
            .get(&(name, arity))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn predicate_count(&self) -> usize {
        self.clauses.len()
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.values().map(Vec::len).sum()
    }
}
