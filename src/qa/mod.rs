//! Fixed-pattern question answering over the crawled graph.

pub mod format;
pub mod router;
pub mod translate;

use std::fmt;

use tracing::debug;

use crate::error::GraphError;
use crate::graph::sparql::SparqlStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Answered(String),
    /// The question was understood but the graph holds no answer.
    NoAnswer,
    /// No pattern matched.
    Unroutable,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Answered(text) => f.write_str(text),
            Outcome::NoAnswer => f.write_str("No answer found."),
            Outcome::Unroutable => f.write_str("Don't know..."),
        }
    }
}

pub fn answer(store: &SparqlStore, question: &str) -> Result<Outcome, GraphError> {
    let Some(routed) = router::route(question) else {
        debug!("No pattern matches {:?}", question);
        return Ok(Outcome::Unroutable);
    };
    debug!("Question #{} ({:?}), params {:?}", routed.index + 1, routed.kind, routed.params);

    let Some(query) = translate::translate(&routed) else {
        return Ok(Outcome::NoAnswer);
    };
    debug!("SPARQL: {}", query.sparql);
    let mut rows = store.select(&query.sparql, &query.select)?;
    rows.retain(|row| query.keeps(row));
    debug!("{} result rows", rows.len());

    Ok(match format::format(routed.kind, &rows) {
        Some(text) => Outcome::Answered(text),
        None => Outcome::NoAnswer,
    })
}
