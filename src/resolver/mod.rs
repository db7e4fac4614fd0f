//! DOI to PDF URL resolution across an ordered mirror list.
//!
//! The resolver fetches `mirror_base + doi` for each configured mirror in
//! priority order and extracts the embedded document URL from the first
//! page that yields one. Per-mirror failures (timeouts, non-success
//! status, connection errors) are logged and the next mirror is tried;
//! exhausting the list returns `None`, which is an expected outcome
//! rather than an error. A mirror that failed is never revisited within
//! the same run.

mod extract;

pub use extract::{default_strategies, normalize_protocol_relative, ExtractStrategy, TagSrcStrategy};

use scraper::Html;
use std::time::Duration;

use crate::utils::HttpClient;

const MIRROR_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves DOIs to direct PDF URLs by scraping mirror pages.
#[derive(Debug)]
pub struct MirrorResolver {
    client: HttpClient,
    mirrors: Vec<String>,
    strategies: Vec<Box<dyn ExtractStrategy>>,
}

impl MirrorResolver {
    /// Create a resolver over the given ordered mirror base URLs, using
    /// the default extraction strategies (iframe, then embed).
    pub fn new(client: HttpClient, mirrors: Vec<String>) -> Self {
        Self {
            client,
            mirrors,
            strategies: default_strategies(),
        }
    }

    /// Replace the extraction strategy list.
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn ExtractStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// The configured mirror list, in priority order.
    pub fn mirrors(&self) -> &[String] {
        &self.mirrors
    }

    /// Resolve a DOI to a direct PDF URL, or `None` if no mirror has one.
    pub async fn resolve(&self, doi: &str) -> Option<String> {
        for mirror in &self.mirrors {
            let url = join_mirror(mirror, doi);
            tracing::debug!(%doi, %url, "probing mirror");

            let response = match self.client.get(&url).timeout(MIRROR_TIMEOUT).send().await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!("error accessing {}: {}", mirror, e);
                    continue;
                }
            };

            if !response.status().is_success() {
                tracing::warn!("{} returned status {}", mirror, response.status());
                continue;
            }

            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("error reading body from {}: {}", mirror, e);
                    continue;
                }
            };

            if let Some(pdf_url) = self.extract_pdf_url(&body) {
                tracing::info!(%doi, %pdf_url, "resolved via {}", mirror);
                return Some(pdf_url);
            }

            tracing::debug!("no embedded document on {}", mirror);
        }

        None
    }

    /// Extract a PDF URL from a mirror page body, trying each strategy in
    /// order. Pure with respect to the network; exposed for tests.
    pub fn extract_pdf_url(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        for strategy in &self.strategies {
            if let Some(src) = strategy.try_extract(&document) {
                tracing::debug!(strategy = strategy.name(), "matched embedded document");
                return Some(normalize_protocol_relative(&src));
            }
        }
        None
    }
}

/// Append a DOI to a mirror base URL, tolerating bases with and without a
/// trailing slash.
fn join_mirror(base: &str, doi: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, doi)
    } else {
        format!("{}/{}", base, doi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> MirrorResolver {
        MirrorResolver::new(HttpClient::new().unwrap(), Vec::new())
    }

    #[test]
    fn test_embed_only_fixture() {
        let html = r#"<html><body><embed src="//example.com/a.pdf" type="application/pdf"></body></html>"#;
        assert_eq!(
            resolver().extract_pdf_url(html),
            Some("https://example.com/a.pdf".to_string())
        );
    }

    #[test]
    fn test_iframe_preferred_over_embed() {
        let html = r#"<html><body>
            <embed src="//embed.example.com/b.pdf">
            <iframe src="//iframe.example.com/a.pdf"></iframe>
        </body></html>"#;
        assert_eq!(
            resolver().extract_pdf_url(html),
            Some("https://iframe.example.com/a.pdf".to_string())
        );
    }

    #[test]
    fn test_absolute_src_kept_as_is() {
        let html = r#"<iframe src="https://cdn.example.com/paper.pdf"></iframe>"#;
        assert_eq!(
            resolver().extract_pdf_url(html),
            Some("https://cdn.example.com/paper.pdf".to_string())
        );
    }

    #[test]
    fn test_no_embedded_document() {
        let html = "<html><body><p>captcha</p></body></html>";
        assert_eq!(resolver().extract_pdf_url(html), None);
    }

    #[test]
    fn test_join_mirror() {
        assert_eq!(
            join_mirror("https://mirror.test/", "10.1/x"),
            "https://mirror.test/10.1/x"
        );
        assert_eq!(
            join_mirror("https://mirror.test", "10.1/x"),
            "https://mirror.test/10.1/x"
        );
    }
}
