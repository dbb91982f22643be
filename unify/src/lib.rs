//! Term model and unifier: components C1 and C2 of the inference engine.
//!
//! This crate has no notion of a knowledge base or a resolver; it is the
//! purely functional core that those layers build on.

mod algorithm;
mod intern;
mod subst;
mod term;

pub use algorithm::{unify, unify_with_occurs_check};
pub use intern::{intern, resolve as resolve_symbol};
pub use subst::{bind, deep_walk, walk, walk_compound, Substitution};
pub use term::{Compound, Num, Term, VarName};
