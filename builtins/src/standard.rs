//! The fixed standard built-in set (§4.5): `eq`, `neq`, the four numeric
//! comparisons, `member`, `or`, `http_get_json`, `unify_json_path`.

use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use unify::{Num, Substitution, Term};

use crate::json_term;
use crate::registry::{Builtin, BuiltinRegistry, RegistryError};
use crate::solver::Solver;

pub fn register_all(registry: &mut BuiltinRegistry) -> Result<(), RegistryError> {
    registry.register("eq", Arc::new(Eq))?;
    registry.register("neq", Arc::new(Neq))?;
    registry.register("gt", Arc::new(Compare(CompareOp::Gt)))?;
    registry.register("gte", Arc::new(Compare(CompareOp::Gte)))?;
    registry.register("lt", Arc::new(Compare(CompareOp::Lt)))?;
    registry.register("lte", Arc::new(Compare(CompareOp::Lte)))?;
    registry.register("member", Arc::new(Member))?;
    registry.register("or", Arc::new(Or))?;
    registry.register("http_get_json", Arc::new(HttpGetJson::default()))?;
    registry.register("unify_json_path", Arc::new(UnifyJsonPath))?;
    Ok(())
}

fn once(sigma: Substitution) -> BoxStream<'static, Substitution> {
    Box::pin(stream::once(async move { sigma }))
}

fn none() -> BoxStream<'static, Substitution> {
    Box::pin(stream::empty())
}

struct Eq;
impl Builtin for Eq {
    fn arity(&self) -> Option<usize> {
        Some(2)
    }

    fn invoke(&self, args: Vec<Term>, sigma: Substitution, _solver: Arc<dyn Solver>) -> BoxStream<'static, Substitution> {
        match unify::unify(&args[0], &args[1], &sigma) {
            Some(extended) => once(extended),
            None => none(),
        }
    }
}

struct Neq;
impl Builtin for Neq {
    fn arity(&self) -> Option<usize> {
        Some(2)
    }

    /// Both arguments must be ground after `deep_walk`; an unbound variable
    /// on either side is failure, not a constructed disequality constraint
    /// (§4.5's explicit design choice).
    fn invoke(&self, args: Vec<Term>, sigma: Substitution, _solver: Arc<dyn Solver>) -> BoxStream<'static, Substitution> {
        let a = unify::deep_walk(&args[0], &sigma);
        let b = unify::deep_walk(&args[1], &sigma);
        if !a.is_ground() || !b.is_ground() {
            return none();
        }
        if a != b {
            once(sigma)
        } else {
            none()
        }
    }
}

enum CompareOp {
    Gt,
    Gte,
    Lt,
    Lte,
}

struct Compare(CompareOp);
impl Builtin for Compare {
    fn arity(&self) -> Option<usize> {
        Some(2)
    }

    fn invoke(&self, args: Vec<Term>, sigma: Substitution, _solver: Arc<dyn Solver>) -> BoxStream<'static, Substitution> {
        let a = unify::deep_walk(&args[0], &sigma);
        let b = unify::deep_walk(&args[1], &sigma);
        let (Term::Num(na), Term::Num(nb)) = (&a, &b) else {
            return none();
        };
        let holds = match self.0 {
            CompareOp::Gt => gt(na, nb),
            CompareOp::Gte => gte(na, nb),
            CompareOp::Lt => gt(nb, na),
            CompareOp::Lte => gte(nb, na),
        };
        if holds {
            once(sigma)
        } else {
            none()
        }
    }
}

fn gt(a: &Num, b: &Num) -> bool {
    matches!(a.partial_cmp(b), Some(std::cmp::Ordering::Greater))
}

fn gte(a: &Num, b: &Num) -> bool {
    matches!(a.partial_cmp(b), Some(std::cmp::Ordering::Greater) | Some(std::cmp::Ordering::Equal))
}

struct Member;
impl Builtin for Member {
    fn arity(&self) -> Option<usize> {
        Some(2)
    }

    /// The second argument is a `list(elem, …)` compound (see
    /// [`json_term`]'s convention, which this built-in also accepts for
    /// plain, non-JSON-derived lists the embedder constructs directly).
    fn invoke(&self, args: Vec<Term>, sigma: Substitution, _solver: Arc<dyn Solver>) -> BoxStream<'static, Substitution> {
        let seq = unify::walk(&args[1], &sigma);
        let elems: Vec<Term> = match seq {
            Term::Compound(c) => c.args.clone(),
            _ => Vec::new(),
        };
        let elem_term = args[0].clone();
        Box::pin(stream::iter(elems).filter_map(move |candidate| {
            let sigma = sigma.clone();
            let elem_term = elem_term.clone();
            async move { unify::unify(&elem_term, &candidate, &sigma) }
        }))
    }
}

struct Or;
impl Builtin for Or {
    /// Each argument is itself a goal; goals are tried in order and every
    /// solution from each is yielded (disjunction), delegating back into the
    /// resolver via `solver`.
    fn invoke(&self, args: Vec<Term>, sigma: Substitution, solver: Arc<dyn Solver>) -> BoxStream<'static, Substitution> {
        let branches: Vec<BoxStream<'static, Substitution>> = args
            .into_iter()
            .map(|goal| solver.solve_goal(goal, sigma.clone()))
            .collect();
        Box::pin(stream::iter(branches).flatten())
    }
}

#[derive(Default)]
struct HttpGetJson {
    client: reqwest::Client,
}

impl Builtin for HttpGetJson {
    fn arity(&self) -> Option<usize> {
        Some(2)
    }

    fn invoke(&self, args: Vec<Term>, sigma: Substitution, _solver: Arc<dyn Solver>) -> BoxStream<'static, Substitution> {
        let url_term = unify::walk(&args[0], &sigma);
        let out_term = args[1].clone();
        let client = self.client.clone();
        Box::pin(async_stream::stream! {
            let Term::Str(url) = url_term else {
                return;
            };
            let response = match client.get(url.as_ref()).send().await {
                Ok(r) => r,
                Err(err) => {
                    log::debug!("http_get_json: request to {url} failed: {err}");
                    return;
                }
            };
            if response.status() != reqwest::StatusCode::OK {
                return;
            }
            let body: serde_json::Value = match response.json().await {
                Ok(v) => v,
                Err(err) => {
                    log::debug!("http_get_json: body from {url} was not valid JSON: {err}");
                    return;
                }
            };
            if let Some(extended) = unify::unify(&out_term, &json_term::from_value(&body), &sigma) {
                yield extended;
            }
        })
    }
}

struct UnifyJsonPath;
impl Builtin for UnifyJsonPath {
    fn arity(&self) -> Option<usize> {
        Some(3)
    }

    fn invoke(&self, args: Vec<Term>, sigma: Substitution, _solver: Arc<dyn Solver>) -> BoxStream<'static, Substitution> {
        let json_value = unify::deep_walk(&args[0], &sigma);
        let path_term = unify::walk(&args[1], &sigma);
        let out_term = args[2].clone();
        let Term::Str(path) = path_term else {
            return none();
        };
        match json_term::path_get(&json_value, &path) {
            Some(node) => match unify::unify(&out_term, &node, &sigma) {
                Some(extended) => once(extended),
                None => none(),
            },
            None => none(),
        }
    }
}
