//! CrossRef title lookup.

use serde::Deserialize;
use std::time::Duration;

use crate::sources::SourceError;
use crate::utils::HttpClient;

const CROSSREF_API_BASE: &str = "https://api.crossref.org";

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// CrossRef works API client, used only to turn a DOI into a paper title
/// for naming downloaded files.
#[derive(Debug, Clone)]
pub struct CrossRefClient {
    client: HttpClient,
    api_base: String,
}

impl CrossRefClient {
    pub fn new(client: HttpClient) -> Self {
        Self::with_base(client, CROSSREF_API_BASE)
    }

    /// Point the client at a different API base (mock servers in tests).
    pub fn with_base(client: HttpClient, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
        }
    }

    /// Look up the title registered for a DOI.
    ///
    /// Title lookup is decorative, not load-bearing: any failure (network,
    /// missing field, malformed JSON) degrades to a filename-safe form of
    /// the DOI itself instead of propagating an error.
    pub async fn lookup_title(&self, doi: &str) -> String {
        match self.try_lookup(doi).await {
            Ok(title) => title,
            Err(e) => {
                tracing::warn!(%doi, "title lookup failed: {}", e);
                doi.replace('/', "_")
            }
        }
    }

    async fn try_lookup(&self, doi: &str) -> Result<String, SourceError> {
        let url = format!("{}/works/{}", self.api_base, doi);

        let response = self
            .client
            .get(&url)
            .timeout(LOOKUP_TIMEOUT)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to reach CrossRef: {}", e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "CrossRef returned status: {}",
                response.status()
            )));
        }

        let data: WorksResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse CrossRef JSON: {}", e)))?;

        data.message
            .title
            .into_iter()
            .next()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SourceError::NotFound(format!("no title registered for {}", doi)))
    }
}

// ===== CrossRef API Types =====

#[derive(Debug, Deserialize)]
struct WorksResponse {
    message: WorksMessage,
}

#[derive(Debug, Deserialize)]
struct WorksMessage {
    #[serde(default)]
    title: Vec<String>,
}
