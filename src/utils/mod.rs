//! Utility modules.
//!
//! - [`HttpClient`]: shared HTTP client with a crate user agent
//! - [`truncate_with_ellipsis`]: unicode-aware text truncation for display

mod display;
mod http;

pub use display::truncate_with_ellipsis;
pub use http::HttpClient;
