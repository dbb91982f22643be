//! Per-use clause renaming (§4.4): before a clause is tried, every variable
//! in its head and body is replaced by a freshly generated variable, with
//! the same old-name-to-new-name mapping reused across every occurrence
//! within that one use.

use std::collections::HashMap;
use std::sync::Arc;

use kb::Clause;
use unify::{Compound, Term, VarName};

use crate::context::ResolveContext;

/// Renames `clause`'s head and body for one trial, returning the renamed
/// head and body goals. Ground clauses (no variables) are unaffected beyond
/// a cheap clone.
pub fn rename_fresh(clause: &Clause, ctx: &ResolveContext) -> (Term, Vec<Term>) {
    let mut mapping: HashMap<VarName, Term> = HashMap::new();
    let head = rename_term(&clause.head, &mut mapping, ctx);
    let body = clause.body.iter().map(|goal| rename_term(goal, &mut mapping, ctx)).collect();
    (head, body)
}

fn rename_term(term: &Term, mapping: &mut HashMap<VarName, Term>, ctx: &ResolveContext) -> Term {
    match term {
        Term::Var(name) => mapping
            .entry(name.clone())
            .or_insert_with(|| ctx.fresh_var(name))
            .clone(),
        Term::Compound(c) => Term::Compound(Arc::new(Compound {
            name: c.name,
            args: c.args.iter().map(|arg| rename_term(arg, mapping, ctx)).collect(),
        })),
        other => other.clone(),
    }
}
