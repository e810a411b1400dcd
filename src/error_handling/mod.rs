//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, registry, fetch, transport)
//! - Transport error categorization
//! - Processing statistics tracking (errors, outcomes, strategies)

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::update_error_stats;
pub use stats::ProcessingStats;
pub use types::{
    ErrorType, FetchError, InitializationError, OutcomeType, RegistryError, RulesError,
    TransportError,
};
