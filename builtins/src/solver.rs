use futures::stream::BoxStream;
use unify::{Substitution, Term};

/// The hook by which a built-in that itself needs to prove a goal (`or`)
/// reaches back into the resolver, without the `builtins` crate depending on
/// `resolve`. The resolver passes an implementation of this trait into every
/// [`crate::Builtin::invoke`] call.
pub trait Solver: Send + Sync {
    /// Proves `goal` under `sigma`, as a lazy stream of extended
    /// substitutions — exactly what `resolve::solve` would produce for a
    /// singleton goal list at the caller's current depth.
    fn solve_goal(&self, goal: Term, sigma: Substitution) -> BoxStream<'static, Substitution>;
}
