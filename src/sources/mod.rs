//! Literature sources that supply the raw record text.
//!
//! The pipeline only needs two operations from a source: resolve a query to a
//! list of record identifiers, and fetch the plain-text dump for those
//! identifiers. Both are expressed by the [`LiteratureSource`] trait so the
//! parser and pipeline can be exercised against [`MockSource`] without
//! touching the network.
//!
//! [`PubMedSource`] is the production implementation on top of the NCBI
//! E-utilities API.

mod pubmed;

pub mod mock;

pub use mock::MockSource;
pub use pubmed::{PubMedEndpoints, PubMedSource, PUBMED_EFETCH_URL, PUBMED_ESEARCH_URL};

use async_trait::async_trait;

/// Interface of a remote literature database.
///
/// `identity` is the contact e-mail the remote service asks callers to send
/// with every request.
#[async_trait]
pub trait LiteratureSource: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g. "pubmed")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Resolve `query` to at most `limit` record identifiers, best match first
    async fn search(
        &self,
        query: &str,
        limit: usize,
        identity: &str,
    ) -> Result<Vec<String>, SourceError>;

    /// Fetch the plain-text records for `ids`, concatenated in one string
    async fn fetch_records(&self, ids: &[String], identity: &str) -> Result<String, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error (XML, JSON, etc.)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// API error from the source
    #[error("API error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<quick_xml::DeError> for SourceError {
    fn from(err: quick_xml::DeError) -> Self {
        SourceError::Parse(format!("XML: {}", err))
    }
}
