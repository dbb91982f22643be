//! The substitution (bindings) and the `walk`/`deep_walk` operations of §3.

use std::sync::Arc;

use crate::term::{Compound, Term, VarName};

/// An immutable, functionally-extendable mapping from variable names to
/// terms. Backed by a persistent hash map so that extending it never
/// invalidates a substitution an outer resolution frame is still holding —
/// backtracking just drops the extended copy.
pub type Substitution = im::HashMap<VarName, Term>;

/// Extends `sigma` with `var ↦ term`, returning a new substitution. `sigma`
/// itself is left untouched, which is what lets a failed branch discard its
/// bindings by simply dropping the returned value.
pub fn bind(sigma: &Substitution, var: VarName, term: Term) -> Substitution {
    let mut next = sigma.clone();
    next.insert(var, term);
    next
}

/// Shallow lookup: if `t` is a bound Variable, follow the chain until a
/// non-Variable or an unbound Variable is reached. Compound arguments are
/// left untouched (use [`deep_walk`] to substitute recursively).
pub fn walk(t: &Term, sigma: &Substitution) -> Term {
    let mut current = t.clone();
    loop {
        match &current {
            Term::Var(name) => match sigma.get(name) {
                Some(bound) => current = bound.clone(),
                None => return current,
            },
            _ => return current,
        }
    }
}

/// Recursive substitution of every Variable in `t`, used when projecting a
/// solution back out to the caller (§3: "used when returning solutions to
/// the user").
pub fn deep_walk(t: &Term, sigma: &Substitution) -> Term {
    match walk(t, sigma) {
        Term::Compound(c) => Term::Compound(Arc::new(Compound {
            name: c.name,
            args: c.args.iter().map(|a| deep_walk(a, sigma)).collect(),
        })),
        other => other,
    }
}

/// Substitutes bound variables in the arguments of a goal, leaving the goal
/// itself a Compound. Used by the resolver before dispatching on the
/// functor name (`walk_compound` in §4.4's pseudocode).
pub fn walk_compound(goal: &Term, sigma: &Substitution) -> Term {
    match goal {
        Term::Compound(c) => Term::Compound(Arc::new(Compound {
            name: c.name,
            args: c.args.iter().map(|a| walk(a, sigma)).collect(),
        })),
        other => other.clone(),
    }
}
