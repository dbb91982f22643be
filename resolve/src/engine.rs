//! The resolver's core algorithm (§4.4): depth-first, left-to-right SLD
//! resolution over a goal list, producing a lazy stream of substitutions.

use std::sync::Arc;

use async_stream::stream;
use futures::stream::{BoxStream, StreamExt};

use builtins::Solver;
use unify::{Substitution, Term};

use crate::context::ResolveContext;
use crate::rename::rename_fresh;
use crate::trace::TraceEvent;

/// `solve(goals, σ, depth, ctx)`: the resolver's one primitive operation.
/// Depth increments only when a rule body is expanded (not for built-ins,
/// not for shrinking the goal list by conjunction); reaching `depth >
/// ctx.max_depth` silently prunes the branch rather than failing loudly.
pub fn solve(goals: Vec<Term>, sigma: Substitution, depth: usize, ctx: Arc<ResolveContext>) -> BoxStream<'static, Substitution> {
    Box::pin(stream! {
        if goals.is_empty() {
            if !ctx.reached_cap() {
                ctx.record_solution();
                yield sigma;
            }
            return;
        }
        if depth > ctx.config.max_depth {
            return;
        }

        let mut rest = goals;
        let goal = rest.remove(0);
        let goal = unify::walk_compound(&goal, &sigma);

        let Term::Compound(compound) = &goal else {
            // Goals are syntactically Compounds; anything else can never
            // match a fact, rule, or built-in.
            return;
        };
        let name = unify::resolve_symbol(compound.name);
        let args: Vec<Term> = compound.args.clone();

        ctx.trace.emit(TraceEvent::Call { goal: goal.clone(), depth });

        if ctx.builtins.contains(name) {
            let Some(handler) = ctx.builtins.get_for_arity(name, args.len()) else {
                // Registered under this name, but called with the wrong
                // number of arguments: fail the branch, same as an unknown
                // predicate, rather than let a handler index out of bounds.
                ctx.trace.emit(TraceEvent::Fail { goal });
                return;
            };
            let goal_solver: Arc<dyn Solver> = Arc::new(GoalSolver { ctx: ctx.clone(), depth });
            let mut extensions = handler.invoke(args, sigma.clone(), goal_solver);
            let mut any = false;
            while let Some(sigma1) = extensions.next().await {
                any = true;
                ctx.trace.emit(TraceEvent::Exit { goal: goal.clone(), sigma_display: crate::trace::render_sigma(&goal, &sigma1) });
                let mut continuation = solve(rest.clone(), sigma1, depth, ctx.clone());
                while let Some(sigma2) = continuation.next().await {
                    yield sigma2;
                    if ctx.reached_cap() {
                        return;
                    }
                }
            }
            if !any {
                ctx.trace.emit(TraceEvent::Fail { goal });
            }
            return;
        }

        let (pred_name, arity) = goal.predicate_key();
        let clauses: Vec<_> = ctx.kb.clauses_for(pred_name, arity).to_vec();
        let mut matched_any = false;
        for (i, clause) in clauses.iter().enumerate() {
            if i > 0 {
                ctx.trace.emit(TraceEvent::Redo { goal: goal.clone() });
            }
            let (head, body) = rename_fresh(clause, &ctx);
            let unified = if ctx.config.occurs_check {
                unify::unify_with_occurs_check(&goal, &head, &sigma)
            } else {
                unify::unify(&goal, &head, &sigma)
            };
            let Some(sigma1) = unified else { continue };
            matched_any = true;
            ctx.trace.emit(TraceEvent::Exit { goal: goal.clone(), sigma_display: crate::trace::render_sigma(&goal, &sigma1) });
            let mut combined = body;
            combined.extend(rest.iter().cloned());
            let mut continuation = solve(combined, sigma1, depth + 1, ctx.clone());
            while let Some(sigma2) = continuation.next().await {
                yield sigma2;
                if ctx.reached_cap() {
                    return;
                }
            }
        }
        if !matched_any {
            ctx.trace.emit(TraceEvent::Fail { goal });
        }
    })
}

/// Lets a built-in (only `or` uses this) prove a goal by delegating back
/// into `solve`, at the depth the built-in itself was invoked at — built-in
/// dispatch never increments depth (§4.4).
struct GoalSolver {
    ctx: Arc<ResolveContext>,
    depth: usize,
}

impl Solver for GoalSolver {
    fn solve_goal(&self, goal: Term, sigma: Substitution) -> BoxStream<'static, Substitution> {
        solve(vec![goal], sigma, self.depth, self.ctx.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use builtins::BuiltinRegistry;
    use kb::KnowledgeBase;

    fn ctx_with(kb: KnowledgeBase) -> Arc<ResolveContext> {
        Arc::new(ResolveContext::new(
            Arc::new(kb),
            Arc::new(BuiltinRegistry::standard()),
            crate::context::ResolveConfig::default(),
        ))
    }

    #[tokio::test]
    async fn basic_fact_query() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact(Term::compound("parent", [Term::atom("david"), Term::atom("john")])).unwrap();
        let ctx = ctx_with(kb);
        let goal = Term::compound("parent", [Term::atom("david"), Term::var("?X")]);
        let mut stream = solve(vec![goal], Substitution::new(), 0, ctx);
        let sigma = stream.next().await.expect("one solution");
        assert_eq!(unify::walk(&Term::var("?X"), &sigma), Term::atom("john"));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn grandparent_derivation_in_order() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact(Term::compound("parent", [Term::atom("david"), Term::atom("john")])).unwrap();
        kb.add_fact(Term::compound("parent", [Term::atom("john"), Term::atom("mary")])).unwrap();
        kb.add_fact(Term::compound("parent", [Term::atom("john"), Term::atom("peter")])).unwrap();
        kb.add_rule(
            Term::compound("grandparent", [Term::var("?A"), Term::var("?C")]),
            vec![
                Term::compound("parent", [Term::var("?A"), Term::var("?P")]),
                Term::compound("parent", [Term::var("?P"), Term::var("?C")]),
            ],
        )
        .unwrap();
        let ctx = ctx_with(kb);
        let goal = Term::compound("grandparent", [Term::atom("david"), Term::var("?GC")]);
        let mut stream = solve(vec![goal], Substitution::new(), 0, ctx);
        let mut results = Vec::new();
        while let Some(sigma) = stream.next().await {
            results.push(unify::walk(&Term::var("?GC"), &sigma));
        }
        assert_eq!(results, vec![Term::atom("mary"), Term::atom("peter")]);
    }

    #[tokio::test]
    async fn recursive_ancestor_with_base_case_first() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact(Term::compound("parent", [Term::atom("a"), Term::atom("b")])).unwrap();
        kb.add_fact(Term::compound("parent", [Term::atom("b"), Term::atom("c")])).unwrap();
        kb.add_fact(Term::compound("parent", [Term::atom("c"), Term::atom("d")])).unwrap();
        kb.add_rule(
            Term::compound("ancestor", [Term::var("?A"), Term::var("?D")]),
            vec![Term::compound("parent", [Term::var("?A"), Term::var("?D")])],
        )
        .unwrap();
        kb.add_rule(
            Term::compound("ancestor", [Term::var("?A"), Term::var("?D")]),
            vec![
                Term::compound("parent", [Term::var("?A"), Term::var("?P")]),
                Term::compound("ancestor", [Term::var("?P"), Term::var("?D")]),
            ],
        )
        .unwrap();
        let ctx = ctx_with(kb);
        let goal = Term::compound("ancestor", [Term::atom("a"), Term::var("?X")]);
        let mut stream = solve(vec![goal], Substitution::new(), 0, ctx);
        let mut results = Vec::new();
        while let Some(sigma) = stream.next().await {
            results.push(unify::walk(&Term::var("?X"), &sigma));
        }
        assert_eq!(results, vec![Term::atom("b"), Term::atom("c"), Term::atom("d")]);
    }

    #[tokio::test]
    async fn disequality_excludes_self_in_sibling_rule() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact(Term::compound("parent", [Term::atom("p"), Term::atom("x")])).unwrap();
        kb.add_fact(Term::compound("parent", [Term::atom("p"), Term::atom("y")])).unwrap();
        kb.add_rule(
            Term::compound("sibling", [Term::var("?S1"), Term::var("?S2")]),
            vec![
                Term::compound("parent", [Term::var("?P"), Term::var("?S1")]),
                Term::compound("parent", [Term::var("?P"), Term::var("?S2")]),
                Term::compound("neq", [Term::var("?S1"), Term::var("?S2")]),
            ],
        )
        .unwrap();
        let ctx = ctx_with(kb);
        let goal = Term::compound("sibling", [Term::atom("x"), Term::var("?S")]);
        let mut stream = solve(vec![goal], Substitution::new(), 0, ctx);
        let mut results = Vec::new();
        while let Some(sigma) = stream.next().await {
            results.push(unify::walk(&Term::var("?S"), &sigma));
        }
        assert_eq!(results, vec![Term::atom("y")]);
    }

    #[tokio::test]
    async fn depth_cutoff_yields_nothing_not_an_error() {
        let mut kb = KnowledgeBase::new();
        kb.add_rule(Term::compound("loop", [Term::var("?X")]), vec![Term::compound("loop", [Term::var("?X")])])
            .unwrap();
        let config = crate::context::ResolveConfig { max_depth: 5, ..Default::default() };
        let ctx = Arc::new(ResolveContext::new(Arc::new(kb), Arc::new(BuiltinRegistry::standard()), config));
        let goal = Term::compound("loop", [Term::atom("a")]);
        let mut stream = solve(vec![goal], Substitution::new(), 0, ctx);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn solution_cap_stops_the_stream_early() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact(Term::compound("parent", [Term::atom("david"), Term::atom("john")])).unwrap();
        kb.add_fact(Term::compound("parent", [Term::atom("john"), Term::atom("mary")])).unwrap();
        kb.add_fact(Term::compound("parent", [Term::atom("john"), Term::atom("peter")])).unwrap();
        kb.add_rule(
            Term::compound("grandparent", [Term::var("?A"), Term::var("?C")]),
            vec![
                Term::compound("parent", [Term::var("?A"), Term::var("?P")]),
                Term::compound("parent", [Term::var("?P"), Term::var("?C")]),
            ],
        )
        .unwrap();
        let config = crate::context::ResolveConfig { max_solutions: Some(1), ..Default::default() };
        let ctx = Arc::new(ResolveContext::new(Arc::new(kb), Arc::new(BuiltinRegistry::standard()), config));
        let goal = Term::compound("grandparent", [Term::atom("david"), Term::var("?GC")]);
        let mut stream = solve(vec![goal], Substitution::new(), 0, ctx);
        let mut results = Vec::new();
        while let Some(sigma) = stream.next().await {
            results.push(sigma);
        }
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn unknown_predicate_fails_silently() {
        let ctx = ctx_with(KnowledgeBase::new());
        let goal = Term::compound("nope", [Term::atom("x")]);
        let mut stream = solve(vec![goal], Substitution::new(), 0, ctx);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn builtin_called_with_wrong_arity_fails_silently() {
        let ctx = ctx_with(KnowledgeBase::new());
        // `eq` takes exactly 2 arguments; a malformed rule body could still
        // produce a 1-arity call here.
        let goal = Term::compound("eq", [Term::atom("x")]);
        let mut stream = solve(vec![goal], Substitution::new(), 0, ctx);
        assert!(stream.next().await.is_none());
    }
}
