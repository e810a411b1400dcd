//! Main application modules.
//!
//! This module provides URL helpers and statistics printing used by the run
//! orchestration and the resolvers.

pub mod statistics;
pub mod url;

// Re-export public API
pub use statistics::print_processing_statistics;
pub use url::{favicon_url, normalized_host, same_url, validate_and_normalize_url};
