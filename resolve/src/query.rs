//! Projecting a resolver solution back to the caller's own variable names
//! (§4.4: "projects it back to the user's original variable names via
//! `deep_walk`, emitting a mapping that includes only variables that
//! appeared in the user's query").

use std::collections::BTreeMap;

use unify::{Substitution, Term};

/// Collects every distinct variable name appearing in `goal`, in the order
/// first seen.
pub fn variables_in(goal: &Term, out: &mut Vec<String>) {
    match goal {
        Term::Var(name) => {
            let name = name.to_string();
            if !out.contains(&name) {
                out.push(name);
            }
        }
        Term::Compound(c) => {
            for arg in &c.args {
                variables_in(arg, out);
            }
        }
        _ => {}
    }
}

/// Projects `sigma` onto the variables of the user's original query goal,
/// deep-walking each to its final bound value (or leaving it as a Var if
/// still unbound).
pub fn project_solution(goal: &Term, sigma: &Substitution) -> BTreeMap<String, Term> {
    let mut names = Vec::new();
    variables_in(goal, &mut names);
    names
        .into_iter()
        .map(|name| {
            let value = unify::deep_walk(&Term::var(&name), sigma);
            (name, value)
        })
        .collect()
}
