//! N-Triples persistence for the triple store.
//!
//! One statement per line: `<subject> <predicate> <object> .` where objects
//! may be quoted literals with an optional `^^<datatype>`. Entity IRIs are
//! [`ENTITY_BASE`] followed by the percent-escaped canonical identifier.

use std::fs;
use std::path::Path;

use super::{Datatype, Literal, Predicate, Term, Triple, TripleStore, ENTITY_BASE};
use crate::error::GraphError;
use crate::names::percent_decode;

pub fn serialize(store: &TripleStore) -> String {
    store.iter().map(|t| to_line(t) + "\n").collect()
}

/// Blank lines and `#` comments are skipped; anything else must parse.
pub fn parse(text: &str) -> Result<TripleStore, GraphError> {
    let mut store = TripleStore::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        store.insert(parse_line(line, idx + 1)?);
    }
    Ok(store)
}

pub fn save(store: &TripleStore, path: &Path) -> Result<(), GraphError> {
    fs::write(path, serialize(store))?;
    Ok(())
}

pub fn load(path: &Path) -> Result<TripleStore, GraphError> {
    parse(&fs::read_to_string(path)?)
}

fn to_line(triple: &Triple) -> String {
    format!(
        "{} <{}> {} .",
        term_token(&triple.subject),
        triple.predicate.iri(),
        term_token(&triple.object)
    )
}

fn term_token(term: &Term) -> String {
    match term {
        Term::Entity(id) => format!("<{}>", entity_iri(id)),
        Term::Relation(p) => format!("<{}>", p.iri()),
        Term::Literal(lit) => {
            let quoted = format!("\"{}\"", escape_literal(&lit.value));
            match lit.datatype.iri() {
                Some(dt) => format!("{}^^<{}>", quoted, dt),
                None => quoted,
            }
        }
    }
}

/// Full IRI of an entity node.
pub fn entity_iri(id: &str) -> String {
    format!("{}{}", ENTITY_BASE, escape_iri(id))
}

fn escape_iri(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for c in id.chars() {
        if c <= ' ' || matches!(c, '%' | '<' | '>' | '"' | '{' | '}' | '[' | ']' | '|' | '\\' | '^' | '`') {
            let mut buf = [0u8; 4];
            for b in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{:02X}", b));
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

enum Token {
    Iri(String),
    Literal {
        value: String,
        datatype: Option<String>,
    },
}

fn parse_line(line: &str, lineno: usize) -> Result<Triple, GraphError> {
    let syntax = |reason: &str| GraphError::Syntax {
        line: lineno,
        reason: reason.to_string(),
    };

    let mut rest = line;
    let mut tokens = Vec::with_capacity(3);
    while tokens.len() < 3 {
        rest = rest.trim_start();
        let (token, after) = if rest.starts_with('<') {
            read_iri(rest).ok_or_else(|| syntax("unterminated IRI"))?
        } else if rest.starts_with('"') {
            read_literal(rest).ok_or_else(|| syntax("unterminated literal"))?
        } else {
            return Err(syntax("expected IRI or literal"));
        };
        tokens.push(token);
        rest = after;
    }
    if rest.trim() != "." {
        return Err(syntax("expected terminating '.'"));
    }

    let mut tokens = tokens.into_iter();
    let (Some(s), Some(p), Some(o)) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(syntax("expected three terms"));
    };

    let predicate = match p {
        Token::Iri(iri) => Predicate::from_iri(&iri).ok_or(GraphError::UnknownIri {
            line: lineno,
            iri,
        })?,
        Token::Literal { .. } => return Err(syntax("predicate must be an IRI")),
    };
    let subject = match s {
        Token::Iri(iri) => iri_term(iri, lineno)?,
        Token::Literal { .. } => return Err(syntax("subject must be an IRI")),
    };
    let object = match o {
        Token::Iri(iri) => iri_term(iri, lineno)?,
        Token::Literal { value, datatype } => {
            let datatype = match datatype {
                None => Datatype::String,
                Some(dt) => Datatype::from_iri(&dt).ok_or(GraphError::UnknownIri {
                    line: lineno,
                    iri: dt,
                })?,
            };
            Term::Literal(Literal { value, datatype })
        }
    };

    Ok(Triple::new(subject, predicate, object))
}

fn iri_term(iri: String, lineno: usize) -> Result<Term, GraphError> {
    if let Some(id) = iri.strip_prefix(ENTITY_BASE) {
        return Ok(Term::Entity(percent_decode(id)));
    }
    Predicate::from_iri(&iri)
        .map(Term::Relation)
        .ok_or(GraphError::UnknownIri { line: lineno, iri })
}

/// `<...>` at the start of `s`; returns the IRI and the remainder.
fn read_iri(s: &str) -> Option<(Token, &str)> {
    let end = s.find('>')?;
    Some((Token::Iri(s[1..end].to_string()), &s[end + 1..]))
}

fn read_literal(s: &str) -> Option<(Token, &str)> {
    let mut value = String::new();
    let mut chars = s.char_indices().skip(1);
    let close = loop {
        let (i, c) = chars.next()?;
        match c {
            '"' => break i,
            '\\' => {
                let (_, esc) = chars.next()?;
                value.push(match esc {
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    '"' => '"',
                    '\\' => '\\',
                    _ => return None,
                });
            }
            _ => value.push(c),
        }
    };

    let mut rest = &s[close + 1..];
    let datatype = match rest.strip_prefix("^^") {
        Some(after) if after.starts_with('<') => {
            let (Token::Iri(dt), after) = read_iri(after)? else {
                return None;
            };
            rest = after;
            Some(dt)
        }
        Some(_) => return None,
        None => None,
    };
    Some((Token::Literal { value, datatype }, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TripleStore {
        let alice = Term::entity("Alice").unwrap();
        let wonderland = Term::entity("Wonderland").unwrap();
        [
            Triple::new(alice.clone(), Predicate::PresidentOf, wonderland.clone()),
            Triple::new(alice.clone(), Predicate::RoleOf, Term::Relation(Predicate::PresidentOf)),
            Triple::new(
                alice.clone(),
                Predicate::BirthDateOf,
                Term::literal("1865-11-26", Datatype::Date),
            ),
            Triple::new(
                wonderland.clone(),
                Predicate::CapitalOf,
                Term::entity("Looking Glass City").unwrap(),
            ),
            Triple::new(
                wonderland.clone(),
                Predicate::PopulationOf,
                Term::literal("1234567", Datatype::Integer),
            ),
            Triple::new(
                wonderland.clone(),
                Predicate::AreaOf,
                Term::literal("12.5", Datatype::Decimal),
            ),
            Triple::new(
                wonderland.clone(),
                Predicate::VicePresidentOf,
                Term::string("The \"Mad\" Hatter\\\nof\tTea"),
            ),
            Triple::new(
                Term::Entity("Côte_d'Ivoire".into()),
                Predicate::GovernmentTypeOf,
                Term::Entity("50%_<odd>_{name}".into()),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn round_trip_empty() {
        let store = TripleStore::new();
        let text = serialize(&store);
        assert!(text.is_empty());
        assert_eq!(parse(&text).unwrap(), store);
    }

    #[test]
    fn round_trip_single() {
        let store: TripleStore = [Triple::new(
            Term::entity("Alice").unwrap(),
            Predicate::PresidentOf,
            Term::entity("Wonderland").unwrap(),
        )]
        .into_iter()
        .collect();
        let text = serialize(&store);
        assert_eq!(
            text,
            "<https://dbpedia.org/page/Alice> <https://dbpedia.org/ontology/president> <https://dbpedia.org/page/Wonderland> .\n"
        );
        assert_eq!(parse(&text).unwrap(), store);
    }

    #[test]
    fn round_trip_many_with_literals() {
        let store = sample();
        assert_eq!(parse(&serialize(&store)).unwrap(), store);
    }

    #[test]
    fn round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.nt");
        let store = sample();
        save(&store, &path).unwrap();
        assert_eq!(load(&path).unwrap(), store);
    }

    #[test]
    fn literal_formatting() {
        let text = serialize(&sample());
        assert!(text.contains(
            "\"1234567\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        ));
        assert!(text.contains("\"The \\\"Mad\\\" Hatter\\\\\\nof\\tTea\" ."));
        assert!(text.contains("<https://dbpedia.org/page/50%25_%3Codd%3E_%7Bname%7D>"));
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let text = "\n# header\n<https://dbpedia.org/page/A> <https://dbpedia.org/ontology/capital> <https://dbpedia.org/page/B> .\n\n";
        assert_eq!(parse(text).unwrap().len(), 1);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse("<https://dbpedia.org/page/A> <https://dbpedia.org/ontology/capital>"),
            Err(GraphError::Syntax { line: 1, .. })
        ));
        assert!(matches!(
            parse("<https://dbpedia.org/page/A> <http://example.org/likes> <https://dbpedia.org/page/B> ."),
            Err(GraphError::UnknownIri { line: 1, .. })
        ));
        assert!(matches!(
            parse("<https://dbpedia.org/page/A> <https://dbpedia.org/ontology/capital> \"open ."),
            Err(GraphError::Syntax { .. })
        ));
    }
}
