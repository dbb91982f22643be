//! A process-wide symbol table for atoms and predicate names.
//!
//! Atoms and predicate names are drawn from a bounded vocabulary that is
//! reused heavily across facts, rules, and queries, so they are interned
//! once via `lasso`. Variable names are not interned here: fresh names
//! minted during clause renaming are unique per use and would only grow
//! this table without bound.

use lasso::{Spur, ThreadedRodeo};
use std::sync::OnceLock;

static SYMBOLS: OnceLock<ThreadedRodeo> = OnceLock::new();

fn symbols() -> &'static ThreadedRodeo {
    SYMBOLS.get_or_init(ThreadedRodeo::new)
}

pub fn intern(s: &str) -> Spur {
    symbols().get_or_intern(s)
}

pub fn resolve(key: Spur) -> &'static str {
    symbols().resolve(&key)
}
