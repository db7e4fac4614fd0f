//! Core data models for papers and search operations.

mod paper;

pub use paper::{Paper, PaperBuilder, SearchMode};
