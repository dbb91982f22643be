//! First-order syntactic unification (component C2, §4.2).

use crate::subst::{bind, walk, Substitution};
use crate::term::Term;

/// Unifies `t1` and `t2` under `sigma`, returning the extended substitution
/// on success or `None` on failure. On failure the caller's `sigma` is
/// untouched — nothing here ever mutates a substitution in place.
///
/// Does not perform an occurs-check (see [`unify_with_occurs_check`] for the
/// opt-in variant); per §3 the engine's closed term model and builtin set
/// cannot synthesize a cyclic binding on their own.
pub fn unify(t1: &Term, t2: &Term, sigma: &Substitution) -> Option<Substitution> {
    unify_impl(t1, t2, sigma, false)
}

/// As [`unify`], but fails instead of producing a cyclic binding. Off by
/// default (see §9's open question on occurs-check); a custom built-in could
/// otherwise construct `?X ↦ f(?X)`, which `deep_walk` would recurse on
/// forever.
pub fn unify_with_occurs_check(t1: &Term, t2: &Term, sigma: &Substitution) -> Option<Substitution> {
    unify_impl(t1, t2, sigma, true)
}

fn unify_impl(
    t1: &Term,
    t2: &Term,
    sigma: &Substitution,
    occurs_check: bool,
) -> Option<Substitution> {
    let a = walk(t1, sigma);
    let b = walk(t2, sigma);

    if a == b {
        return Some(sigma.clone());
    }

    match (&a, &b) {
        (Term::Var(name), _) => {
            if occurs_check && occurs(name, &b, sigma) {
                return None;
            }
            Some(bind(sigma, name.clone(), b))
        }
        (_, Term::Var(name)) => {
            if occurs_check && occurs(name, &a, sigma) {
                return None;
            }
            Some(bind(sigma, name.clone(), a))
        }
        (Term::Compound(c1), Term::Compound(c2)) => {
            if c1.name != c2.name || c1.args.len() != c2.args.len() {
                return None;
            }
            let mut current = sigma.clone();
            for (arg1, arg2) in c1.args.iter().zip(c2.args.iter()) {
                current = unify_impl(arg1, arg2, &current, occurs_check)?;
            }
            Some(current)
        }
        _ => None,
    }
}

fn occurs(name: &crate::term::VarName, t: &Term, sigma: &Substitution) -> bool {
    match walk(t, sigma) {
        Term::Var(v) => &v == name,
        Term::Compound(c) => c.args.iter().any(|arg| occurs(name, arg, sigma)),
        _ => false,
    }
}
