//! Extraction strategies for embedded document references.
//!
//! Mirror pages embed the PDF viewer in one of two markup shapes. Each
//! shape is a strategy; the resolver tries them in order and the first
//! match wins. New mirror-specific shapes can be added without touching
//! the resolver's control flow.

use scraper::{Html, Selector};

/// One way of pulling an embedded document URL out of a mirror page.
pub trait ExtractStrategy: Send + Sync + std::fmt::Debug {
    /// Strategy name for log output.
    fn name(&self) -> &str;

    /// Try to extract a document URL from the parsed page.
    fn try_extract(&self, html: &Html) -> Option<String>;
}

/// Takes the `src` attribute of the first element with the given tag name.
#[derive(Debug, Clone)]
pub struct TagSrcStrategy {
    tag: String,
}

impl TagSrcStrategy {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl ExtractStrategy for TagSrcStrategy {
    fn name(&self) -> &str {
        &self.tag
    }

    fn try_extract(&self, html: &Html) -> Option<String> {
        let selector = Selector::parse(&format!("{}[src]", self.tag)).ok()?;
        html.select(&selector)
            .next()
            .and_then(|elem| elem.value().attr("src"))
            .map(|src| src.to_string())
    }
}

/// The strategies every mirror is probed with, in priority order:
/// an iframe viewer first, then an embed element.
pub fn default_strategies() -> Vec<Box<dyn ExtractStrategy>> {
    vec![
        Box::new(TagSrcStrategy::new("iframe")),
        Box::new(TagSrcStrategy::new("embed")),
    ]
}

/// Rewrite a protocol-relative reference (`//host/path`) to an explicit
/// secure absolute URL.
pub fn normalize_protocol_relative(src: &str) -> String {
    if let Some(rest) = src.strip_prefix("//") {
        format!("https://{}", rest)
    } else {
        src.to_string()
    }
}
