//! End-to-end scenarios against the public embedding API.

use futures::StreamExt;
use orchestrator::{Engine, QueryOptions};
use unify::Term;

fn opts() -> QueryOptions {
    QueryOptions::default()
}

#[tokio::test]
async fn basic_fact() {
    let engine = Engine::new(Vec::new()).unwrap();
    engine.add_fact(Term::compound("parent", [Term::atom("david"), Term::atom("john")])).await.unwrap();

    let goal = Term::compound("parent", [Term::atom("david"), Term::var("?X")]);
    let mut stream = engine.query(goal, opts()).await;
    let solutions: Vec<_> = stream.by_ref().collect().await;
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0].get("?X"), Some(&Term::atom("john")));
}

#[tokio::test]
async fn grandparent_derivation() {
    let engine = Engine::new(Vec::new()).unwrap();
    for (a, b) in [("david", "john"), ("john", "mary"), ("john", "peter")] {
        engine.add_fact(Term::compound("parent", [Term::atom(a), Term::atom(b)])).await.unwrap();
    }
    engine
        .add_rule(
            Term::compound("grandparent", [Term::var("?A"), Term::var("?C")]),
            vec![
                Term::compound("parent", [Term::var("?A"), Term::var("?P")]),
                Term::compound("parent", [Term::var("?P"), Term::var("?C")]),
            ],
        )
        .await
        .unwrap();

    let goal = Term::compound("grandparent", [Term::atom("david"), Term::var("?GC")]);
    let mut stream = engine.query(goal, opts()).await;
    let mut results = Vec::new();
    while let Some(solution) = stream.next().await {
        results.push(solution.get("?GC").cloned().unwrap());
    }
    assert_eq!(results, vec![Term::atom("mary"), Term::atom("peter")]);
}

#[tokio::test]
async fn recursive_ancestor_with_base_case_first() {
    let engine = Engine::new(Vec::new()).unwrap();
    for (a, b) in [("a", "b"), ("b", "c"), ("c", "d")] {
        engine.add_fact(Term::compound("parent", [Term::atom(a), Term::atom(b)])).await.unwrap();
    }
    engine
        .add_rule(
            Term::compound("ancestor", [Term::var("?A"), Term::var("?D")]),
            vec![Term::compound("parent", [Term::var("?A"), Term::var("?D")])],
        )
        .await
        .unwrap();
    engine
        .add_rule(
            Term::compound("ancestor", [Term::var("?A"), Term::var("?D")]),
            vec![
                Term::compound("parent", [Term::var("?A"), Term::var("?P")]),
                Term::compound("ancestor", [Term::var("?P"), Term::var("?D")]),
            ],
        )
        .await
        .unwrap();

    let goal = Term::compound("ancestor", [Term::atom("a"), Term::var("?X")]);
    let mut stream = engine.query(goal, opts()).await;
    let mut results = Vec::new();
    while let Some(solution) = stream.next().await {
        results.push(solution.get("?X").cloned().unwrap());
    }
    assert_eq!(results, vec![Term::atom("b"), Term::atom("c"), Term::atom("d")]);
}

#[tokio::test]
async fn disequality_excludes_self_as_sibling() {
    let engine = Engine::new(Vec::new()).unwrap();
    engine.add_fact(Term::compound("parent", [Term::atom("p"), Term::atom("x")])).await.unwrap();
    engine.add_fact(Term::compound("parent", [Term::atom("p"), Term::atom("y")])).await.unwrap();
    engine
        .add_rule(
            Term::compound("sibling", [Term::var("?S1"), Term::var("?S2")]),
            vec![
                Term::compound("parent", [Term::var("?P"), Term::var("?S1")]),
                Term::compound("parent", [Term::var("?P"), Term::var("?S2")]),
                Term::compound("neq", [Term::var("?S1"), Term::var("?S2")]),
            ],
        )
        .await
        .unwrap();

    let goal = Term::compound("sibling", [Term::atom("x"), Term::var("?S")]);
    let mut stream = engine.query(goal, opts()).await;
    let mut results = Vec::new();
    while let Some(solution) = stream.next().await {
        results.push(solution.get("?S").cloned().unwrap());
    }
    assert_eq!(results, vec![Term::atom("y")]);
}

#[tokio::test]
async fn depth_cutoff_is_silent() {
    let engine = Engine::new(Vec::new()).unwrap();
    engine
        .add_rule(Term::compound("loop", [Term::var("?X")]), vec![Term::compound("loop", [Term::var("?X")])])
        .await
        .unwrap();

    let goal = Term::compound("loop", [Term::atom("a")]);
    let query_opts = QueryOptions { max_depth: Some(5), ..opts() };
    let mut stream = engine.query(goal, query_opts).await;
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn solution_cap_yields_exactly_one() {
    let engine = Engine::new(Vec::new()).unwrap();
    for (a, b) in [("david", "john"), ("john", "mary"), ("john", "peter")] {
        engine.add_fact(Term::compound("parent", [Term::atom(a), Term::atom(b)])).await.unwrap();
    }
    engine
        .add_rule(
            Term::compound("grandparent", [Term::var("?A"), Term::var("?C")]),
            vec![
                Term::compound("parent", [Term::var("?A"), Term::var("?P")]),
                Term::compound("parent", [Term::var("?P"), Term::var("?C")]),
            ],
        )
        .await
        .unwrap();

    let goal = Term::compound("grandparent", [Term::atom("david"), Term::var("?GC")]);
    let query_opts = QueryOptions { max_solutions: Some(1), ..opts() };
    let mut stream = engine.query(goal, query_opts).await;
    let solutions: Vec<_> = stream.by_ref().collect().await;
    assert_eq!(solutions.len(), 1);
}
