use thiserror::Error;

/// A page could not be retrieved. The crawl treats this as "no document".
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("no page at {url}")]
    Missing { url: String },
}

/// A page handler could not make sense of a fetched document.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("no info box on {url}")]
    NoInfobox { url: String },
    #[error("no country table on {url}")]
    NoCountryTable { url: String },
}

/// Crawl-level failures. Only the seed page can stop a crawl.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("could not fetch seed page")]
    Seed(#[source] FetchError),
    #[error("could not read seed page")]
    SeedPage(#[source] HandlerError),
}

/// Reading or writing the persisted triple file.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("line {line}: {reason}")]
    Syntax { line: usize, reason: String },
    #[error("line {line}: unknown IRI <{iri}>")]
    UnknownIri { line: usize, iri: String },
    #[error("line {line}: bad literal {value:?}")]
    BadLiteral { line: usize, value: String },
    #[error("SPARQL error: {message}")]
    Sparql { message: String },
}
