//! Remote API clients.
//!
//! Two upstream services are consulted: the DBLP search API for
//! bibliographic queries, and the CrossRef works API for resolving a DOI
//! to a paper title. Mirror scraping lives in [`crate::resolver`] because
//! it is best-effort and never surfaces errors to the caller; the clients
//! here do.

mod crossref;
mod dblp;

pub use crossref::CrossRefClient;
pub use dblp::{DblpClient, DblpEndpoints};

/// Errors that can occur when talking to a remote source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Invalid request parameters (e.g. a bad search mode)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error (JSON, HTML)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Paper not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-success status from the remote API
    #[error("API error: {0}")]
    Api(String),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}
