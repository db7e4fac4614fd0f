//! Paper model and search mode.

use serde::{Deserialize, Serialize};

/// Which DBLP search endpoint a query is routed to.
///
/// This is a closed enumeration: a mode string that does not match one of
/// the three variants fails to parse before any network call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Publication,
    Author,
    Venue,
}

impl SearchMode {
    /// Returns the mode identifier as used in the CLI and config.
    pub fn id(&self) -> &'static str {
        match self {
            SearchMode::Publication => "publication",
            SearchMode::Author => "author",
            SearchMode::Venue => "venue",
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for SearchMode {
    type Err = crate::sources::SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "publication" => Ok(SearchMode::Publication),
            "author" => Ok(SearchMode::Author),
            "venue" => Ok(SearchMode::Venue),
            other => Err(crate::sources::SourceError::InvalidRequest(format!(
                "invalid search mode '{}' (expected 'publication', 'author' or 'venue')",
                other
            ))),
        }
    }
}

/// A paper record normalized from a DBLP search hit.
///
/// Every field that can be absent upstream is filled with a documented
/// default rather than dropping the record: `"Untitled"` for the title,
/// `"N/A"` for year and venue, empty strings for DOI and URL, and an
/// empty author list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    /// Paper title
    pub title: String,

    /// Publication year (kept as text; DBLP sometimes omits it)
    pub year: String,

    /// Venue (journal or conference)
    pub venue: String,

    /// Digital Object Identifier, empty when DBLP has none on record
    pub doi: String,

    /// DBLP record URL, possibly empty
    pub url: String,

    /// Author names in document order
    pub authors: Vec<String>,
}

impl Paper {
    /// Create a paper with all fields at their documented defaults.
    pub fn untitled() -> Self {
        Self {
            title: "Untitled".to_string(),
            year: "N/A".to_string(),
            venue: "N/A".to_string(),
            doi: String::new(),
            url: String::new(),
            authors: Vec::new(),
        }
    }

    /// Whether a PDF lookup can be attempted for this paper.
    pub fn has_doi(&self) -> bool {
        !self.doi.is_empty()
    }
}

impl Default for Paper {
    fn default() -> Self {
        Self::untitled()
    }
}

/// Builder for constructing [`Paper`] records.
#[derive(Debug, Clone)]
pub struct PaperBuilder {
    paper: Paper,
}

impl PaperBuilder {
    /// Start from the documented defaults.
    pub fn new() -> Self {
        Self {
            paper: Paper::untitled(),
        }
    }

    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.paper.title = title.into();
        self
    }

    /// Set the year
    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.paper.year = year.into();
        self
    }

    /// Set the venue
    pub fn venue(mut self, venue: impl Into<String>) -> Self {
        self.paper.venue = venue.into();
        self
    }

    /// Set the DOI
    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.paper.doi = doi.into();
        self
    }

    /// Set the record URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.paper.url = url.into();
        self
    }

    /// Set the author list
    pub fn authors(mut self, authors: Vec<String>) -> Self {
        self.paper.authors = authors;
        self
    }

    /// Build the Paper
    pub fn build(self) -> Paper {
        self.paper
    }
}

impl Default for PaperBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_defaults() {
        let paper = Paper::untitled();
        assert_eq!(paper.title, "Untitled");
        assert_eq!(paper.year, "N/A");
        assert_eq!(paper.venue, "N/A");
        assert!(paper.doi.is_empty());
        assert!(paper.authors.is_empty());
        assert!(!paper.has_doi());
    }

    #[test]
    fn test_paper_builder() {
        let paper = PaperBuilder::new()
            .title("Test Paper")
            .year("2020")
            .venue("CHI")
            .doi("10.1234/test.1234")
            .authors(vec!["John Doe".to_string(), "Jane Smith".to_string()])
            .build();

        assert_eq!(paper.title, "Test Paper");
        assert_eq!(paper.year, "2020");
        assert_eq!(paper.authors, vec!["John Doe", "Jane Smith"]);
        assert!(paper.has_doi());
    }

    #[test]
    fn test_search_mode_parse() {
        assert_eq!(
            "publication".parse::<SearchMode>().unwrap(),
            SearchMode::Publication
        );
        assert_eq!("Author".parse::<SearchMode>().unwrap(), SearchMode::Author);
        assert_eq!("venue".parse::<SearchMode>().unwrap(), SearchMode::Venue);
        assert!("journal".parse::<SearchMode>().is_err());
    }
}
