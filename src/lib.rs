//! # paper-scout
//!
//! Search the DBLP bibliography and fetch paper PDFs from mirror services
//! by DOI.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Paper, SearchMode)
//! - [`sources`]: Remote API clients (DBLP search, CrossRef title lookup)
//! - [`resolver`]: DOI to PDF URL resolution across an ordered mirror list
//! - [`retrieve`]: Batch PDF retrieval with append-only outcome logs
//! - [`utils`]: HTTP client and display utilities
//! - [`config`]: Configuration management

pub mod config;
pub mod models;
pub mod resolver;
pub mod retrieve;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use models::{Paper, SearchMode};
pub use resolver::MirrorResolver;
pub use sources::{CrossRefClient, DblpClient, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
