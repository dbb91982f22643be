//! Conversion between `serde_json::Value` and the term model, and dotted-path
//! lookups over the resulting term, for `http_get_json` and `unify_json_path`.

use serde_json::Value;
use unify::Term;

/// Encodes a JSON value as a Term. Objects become `object(entry(key, val),
/// …)` compounds (one `entry` per key, in `serde_json`'s map order); arrays
/// become `list(elem, …)` compounds.
pub fn from_value(value: &Value) -> Term {
    match value {
        Value::Null => Term::atom("null"),
        Value::Bool(b) => Term::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Term::int(i)
            } else {
                Term::float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => Term::str(s),
        Value::Array(items) => Term::compound("list", items.iter().map(from_value)),
        Value::Object(map) => Term::compound(
            "object",
            map.iter()
                .map(|(k, v)| Term::compound("entry", [Term::str(k), from_value(v)])),
        ),
    }
}

/// Looks up a `.`-separated path (e.g. `"results.0.name"`) in a Term built by
/// [`from_value`]. Numeric segments index into `list` compounds; other
/// segments look up the matching `entry` key in an `object` compound.
pub fn path_get(term: &Term, path: &str) -> Option<Term> {
    let mut current = term.clone();
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        current = step(&current, segment)?;
    }
    Some(current)
}

fn step(term: &Term, segment: &str) -> Option<Term> {
    match term {
        Term::Compound(c) if unify::resolve_symbol(c.name) == "list" => {
            let index: usize = segment.parse().ok()?;
            c.args.get(index).cloned()
        }
        Term::Compound(c) if unify::resolve_symbol(c.name) == "object" => {
            c.args.iter().find_map(|entry| match entry {
                Term::Compound(e) if e.args.len() == 2 => match &e.args[0] {
                    Term::Str(key) if key.as_ref() == segment => Some(e.args[1].clone()),
                    _ => None,
                },
                _ => None,
            })
        }
        _ => None,
    }
}
