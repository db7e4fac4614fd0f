//! DBLP search client.
//!
//! Queries the DBLP publication/author/venue search endpoints in JSON
//! format and normalizes the response envelope, which is documented but
//! irregular: the `result` field may be a diagnostic string, the hit list
//! may be absent or malformed, and `authors.author` may be a single
//! object or an array. Normalization therefore works over
//! `serde_json::Value` instead of typed structs.

use serde_json::Value;

use crate::models::{Paper, PaperBuilder, SearchMode};
use crate::sources::SourceError;
use crate::utils::HttpClient;
use std::time::Duration;

const DBLP_PUBL_API: &str = "https://dblp.org/search/publ/api";
const DBLP_AUTHOR_API: &str = "https://dblp.org/search/author/api";
const DBLP_VENUE_API: &str = "https://dblp.org/search/venue/api";

const SEARCH_TIMEOUT: Duration = Duration::from_secs(20);

/// The three mode-specific DBLP endpoint base URLs.
///
/// Injectable so tests can point the client at a mock server.
#[derive(Debug, Clone)]
pub struct DblpEndpoints {
    pub publication: String,
    pub author: String,
    pub venue: String,
}

impl DblpEndpoints {
    /// Endpoint base URL for the given search mode.
    pub fn for_mode(&self, mode: SearchMode) -> &str {
        match mode {
            SearchMode::Publication => &self.publication,
            SearchMode::Author => &self.author,
            SearchMode::Venue => &self.venue,
        }
    }
}

impl Default for DblpEndpoints {
    fn default() -> Self {
        Self {
            publication: DBLP_PUBL_API.to_string(),
            author: DBLP_AUTHOR_API.to_string(),
            venue: DBLP_VENUE_API.to_string(),
        }
    }
}

/// DBLP search client
#[derive(Debug, Clone)]
pub struct DblpClient {
    client: HttpClient,
    endpoints: DblpEndpoints,
}

impl DblpClient {
    pub fn new(client: HttpClient, endpoints: DblpEndpoints) -> Self {
        Self { client, endpoints }
    }

    /// Search DBLP and return normalized paper records.
    ///
    /// A non-success HTTP status is surfaced as [`SourceError::Api`]; an
    /// unexpected response shape degrades to zero results with a warning,
    /// matching what the DBLP API actually sends when a query misfires.
    pub async fn search(
        &self,
        mode: SearchMode,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Paper>, SourceError> {
        let url = format!(
            "{}?q=*{}&format=json&h={}",
            self.endpoints.for_mode(mode),
            urlencoding::encode(query),
            max_results
        );

        tracing::debug!(%mode, %url, "searching DBLP");

        let response = self
            .client
            .get(&url)
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to reach DBLP: {}", e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "DBLP returned status: {}",
                response.status()
            )));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse DBLP JSON: {}", e)))?;

        Ok(parse_response(&data))
    }
}

/// Normalize a DBLP response envelope into paper records.
///
/// Tolerates every irregularity the API is known to produce; a hit whose
/// `info` payload is not an object is the only thing skipped outright.
pub fn parse_response(data: &Value) -> Vec<Paper> {
    let result = &data["result"];
    if let Some(message) = result.as_str() {
        tracing::warn!("unexpected DBLP result format: {}", message);
        return Vec::new();
    }

    let hits = &result["hits"];
    if hits.as_str().is_some() {
        tracing::warn!("unexpected DBLP hits format");
        return Vec::new();
    }

    let hit_list = match hits["hit"].as_array() {
        Some(list) => list,
        None => return Vec::new(),
    };

    let mut papers = Vec::new();
    for hit in hit_list {
        let info = match hit["info"].as_object() {
            Some(info) => info,
            None => continue,
        };

        let paper = PaperBuilder::new()
            .title(text_or(info.get("title"), "Untitled"))
            .year(text_or(info.get("year"), "N/A"))
            .venue(text_or(info.get("venue"), "N/A"))
            .doi(text_or(info.get("doi"), ""))
            .url(text_or(info.get("url"), ""))
            .authors(parse_authors(info.get("authors")))
            .build();

        papers.push(paper);
    }

    papers
}

/// Read a field as text, accepting numbers, with a default for anything else.
fn text_or(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

/// Normalize the `authors` field to an ordered list of names.
///
/// DBLP serializes a single author as `{"author": {"text": ...}}` and
/// multiple authors as `{"author": [{"text": ...}, ...]}`.
fn parse_authors(authors: Option<&Value>) -> Vec<String> {
    let author = match authors {
        Some(value) => &value["author"],
        None => return Vec::new(),
    };

    match author {
        Value::Object(_) => vec![author_name(author)],
        Value::Array(list) => list.iter().map(author_name).collect(),
        _ => Vec::new(),
    }
}

fn author_name(author: &Value) -> String {
    author["text"].as_str().unwrap_or_default().to_string()
}
