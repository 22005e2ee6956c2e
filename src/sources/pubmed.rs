//! PubMed research source implementation using E-utilities API.

use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;
use std::sync::Arc;

use crate::sources::{LiteratureSource, SourceError};
use crate::utils::HttpClient;

/// PubMed E-utilities API base URLs
pub const PUBMED_ESEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";
pub const PUBMED_EFETCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";

/// Endpoints and caller identification sent to E-utilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubMedEndpoints {
    pub esearch_url: String,
    pub efetch_url: String,
    /// Value of the `tool` parameter NCBI asks registered callers to send
    pub tool: String,
    /// Optional NCBI API key
    pub api_key: Option<String>,
}

impl Default for PubMedEndpoints {
    fn default() -> Self {
        Self {
            esearch_url: PUBMED_ESEARCH_URL.to_string(),
            efetch_url: PUBMED_EFETCH_URL.to_string(),
            tool: env!("CARGO_PKG_NAME").to_string(),
            api_key: None,
        }
    }
}

/// PubMed research source
///
/// Uses NCBI E-utilities: `esearch` to resolve the query to PMIDs sorted by
/// relevance, then `efetch` with `rettype=abstract&retmode=text` to download
/// the plain-text records.
#[derive(Debug, Clone)]
pub struct PubMedSource {
    client: Arc<HttpClient>,
    endpoints: PubMedEndpoints,
}

impl PubMedSource {
    /// Create a new PubMed source
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self {
            client: Arc::new(HttpClient::new()?),
            endpoints: PubMedEndpoints::default(),
        })
    }

    /// Create with a custom HTTP client and endpoints
    pub fn with_client(client: Arc<HttpClient>, endpoints: PubMedEndpoints) -> Self {
        Self { client, endpoints }
    }

    pub fn endpoints(&self) -> &PubMedEndpoints {
        &self.endpoints
    }

    /// Query parameters shared by every E-utilities call
    fn common_params(&self, identity: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("db", "pubmed".to_string()),
            ("tool", self.endpoints.tool.clone()),
            ("email", identity.to_string()),
        ];
        if let Some(key) = &self.endpoints.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }

    /// Build E-utilities search parameters
    fn search_params(&self, query: &str, limit: usize, identity: &str) -> Vec<(&'static str, String)> {
        let mut params = self.common_params(identity);
        params.extend([
            ("sort", "relevance".to_string()),
            ("retmax", limit.to_string()),
            ("retmode", "xml".to_string()),
            ("term", query.to_string()),
        ]);
        params
    }

    /// Build E-utilities fetch parameters for specific PubMed IDs
    fn fetch_params(&self, ids: &[String], identity: &str) -> Vec<(&'static str, String)> {
        let mut params = self.common_params(identity);
        params.extend([
            ("id", ids.join(",")),
            ("retmode", "text".to_string()),
            ("rettype", "abstract".to_string()),
        ]);
        params
    }

    /// Parse E-utilities search response XML
    fn parse_search_response(xml: &str) -> Result<Vec<String>, SourceError> {
        #[derive(Debug, Deserialize)]
        #[allow(non_snake_case)]
        struct ESearchResult {
            IdList: Option<IdList>,
            ERROR: Option<String>,
        }

        #[derive(Debug, Deserialize)]
        #[allow(non_snake_case)]
        struct IdList {
            #[serde(rename = "Id", default)]
            ids: Vec<String>,
        }

        let result: ESearchResult = from_str(xml)?;

        if let Some(message) = result.ERROR {
            return Err(SourceError::Api(format!("PubMed search failed: {}", message)));
        }

        Ok(result.IdList.map(|list| list.ids).unwrap_or_default())
    }

    async fn get_text(
        &self,
        url: &str,
        params: &[(&'static str, String)],
        what: &str,
    ) -> Result<String, SourceError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to {} PubMed: {}", what, e)))?;

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                tracing::debug!("PubMed API rate-limited");
            }
            return Err(SourceError::Api(format!(
                "PubMed API returned status: {}",
                status
            )));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl LiteratureSource for PubMedSource {
    fn id(&self) -> &str {
        "pubmed"
    }

    fn name(&self) -> &str {
        "PubMed"
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
        identity: &str,
    ) -> Result<Vec<String>, SourceError> {
        if query.trim().is_empty() {
            return Err(SourceError::InvalidRequest("empty search query".to_string()));
        }

        let params = self.search_params(query, limit, identity);
        tracing::debug!(url = %self.endpoints.esearch_url, query, limit, "Searching PubMed");

        let xml = self
            .get_text(&self.endpoints.esearch_url, &params, "search")
            .await?;
        let ids = Self::parse_search_response(&xml)?;

        tracing::debug!(count = ids.len(), "PubMed search returned ids");
        Ok(ids)
    }

    async fn fetch_records(&self, ids: &[String], identity: &str) -> Result<String, SourceError> {
        if ids.is_empty() {
            return Ok(String::new());
        }

        let params = self.fetch_params(ids, identity);
        tracing::debug!(url = %self.endpoints.efetch_url, count = ids.len(), "Fetching PubMed records");

        self.get_text(&self.endpoints.efetch_url, &params, "fetch")
            .await
    }
}
