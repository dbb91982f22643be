//! Parser for the knowledge-base text file format (§6): a `facts` section of
//! tuples followed by a `rules` section of `head :- body, body, …` records.
//! Insertion order of `facts` then `rules`, in file order, is what defines
//! the resolver's trial order once loaded.

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use kb::KnowledgeBase;
use unify::Term;

#[derive(Parser)]
#[grammar = "grammar.pest"]
struct KbFileParser;

#[derive(thiserror::Error, Debug)]
pub enum KbFileError {
    #[error("knowledge-base file parse error: {0}")]
    Parse(#[from] Box<pest::error::Error<Rule>>),
    #[error(transparent)]
    Clause(#[from] kb::ClauseError),
}

impl From<pest::error::Error<Rule>> for KbFileError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        KbFileError::Parse(Box::new(err))
    }
}

/// The facts and rules extracted from one file, in file order, before
/// they're validated and inserted into a [`KnowledgeBase`].
pub struct ParsedKb {
    pub facts: Vec<Term>,
    pub rules: Vec<(Term, Vec<Term>)>,
}

pub fn parse(text: &str) -> Result<ParsedKb, KbFileError> {
    let mut file_pairs = KbFileParser::parse(Rule::file, text)?;
    let file_pair = file_pairs.next().expect("file rule always produces one pair");

    let mut facts = Vec::new();
    let mut rules = Vec::new();
    for section in file_pair.into_inner() {
        match section.as_rule() {
            Rule::facts_section => {
                for tuple in section.into_inner() {
                    facts.push(tuple_to_term(tuple));
                }
            }
            Rule::rules_section => {
                for record in section.into_inner() {
                    let mut tuples = record.into_inner();
                    let head = tuple_to_term(tuples.next().expect("rule_record has a head tuple"));
                    let body = tuples.map(tuple_to_term).collect();
                    rules.push((head, body));
                }
            }
            Rule::EOI => {}
            _ => unreachable!("file only contains facts_section, rules_section, EOI"),
        }
    }
    Ok(ParsedKb { facts, rules })
}

/// Parses a single standalone goal tuple, e.g. `"parent(david, ?X)"` — the
/// form a REPL or `query_one`-style caller types interactively, as opposed
/// to a whole knowledge-base file.
pub fn parse_goal(text: &str) -> Result<Term, KbFileError> {
    let mut pairs = KbFileParser::parse(Rule::goal_line, text)?;
    let goal_line = pairs.next().expect("goal_line rule always produces one pair");
    let tuple = goal_line.into_inner().next().expect("goal_line wraps exactly one tuple");
    Ok(tuple_to_term(tuple))
}

/// Parses `text` and inserts every fact then every rule into `kb`, in file
/// order. On any clause validation error the knowledge base may already
/// contain a prefix of the file's clauses — callers that need atomicity
/// should parse into a fresh `KnowledgeBase` and merge it in on success.
pub fn load_into(kb: &mut KnowledgeBase, text: &str) -> Result<(), KbFileError> {
    let parsed = parse(text)?;
    for fact in parsed.facts {
        kb.add_fact(fact)?;
    }
    for (head, body) in parsed.rules {
        kb.add_rule(head, body)?;
    }
    Ok(())
}

fn tuple_to_term(pair: Pair<Rule>) -> Term {
    let mut inner = pair.into_inner();
    let name = inner.next().expect("tuple always names a predicate").as_str();
    let args = inner.map(value_to_term).collect::<Vec<_>>();
    Term::compound(name, args)
}

fn value_to_term(pair: Pair<Rule>) -> Term {
    let inner = pair.into_inner().next().expect("value always wraps one literal");
    match inner.as_rule() {
        Rule::var => Term::var(inner.as_str()),
        Rule::float_lit => Term::float(inner.as_str().parse().expect("grammar guarantees a valid float")),
        Rule::int_lit => Term::int(inner.as_str().parse().expect("grammar guarantees a valid int")),
        Rule::bool_lit => Term::Bool(inner.as_str() == "true"),
        Rule::string_lit => {
            let raw = inner.as_str();
            Term::str(&raw[1..raw.len() - 1])
        }
        Rule::ident => Term::atom(inner.as_str()),
        other => unreachable!("value cannot wrap {other:?}"),
    }
}
