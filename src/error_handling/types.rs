//! Error type definitions.
//!
//! This module defines the error and outcome types used throughout the application.

use std::path::PathBuf;
use std::time::Duration;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing an HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// No fetch strategy could be built.
    #[error("No fetch strategy available (requested: {0})")]
    NoStrategiesError(String),
}

/// Error types for registry load/save.
///
/// `Unavailable` and `Malformed` abort the run before any fetching begins.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The registry file is missing or unreadable.
    #[error("Registry {path} is unavailable: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The registry file is not a JSON object of entries.
    #[error("Registry {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing or writing the updated registry failed.
    #[error("Failed to write registry {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error types for loading extra classifier rules.
#[derive(Error, Debug)]
pub enum RulesError {
    #[error("Failed to read rules file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse rules file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A single strategy attempt that produced no HTTP response.
///
/// Always recovered locally by falling through to the next strategy.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection, TLS, redirect-policy or body error reported by the client.
    #[error("{0}")]
    Request(#[from] ReqwestError),

    /// The attempt exceeded its hard deadline.
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure of a whole fetch (all strategies, including any manual redirect chase).
///
/// Non-fatal for the run: the entry keeps its prior URL.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL is not an absolute http(s) URL.
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The manual redirect chase went deeper than allowed.
    #[error("Manual redirect depth {depth} exceeds limit {max} at {url}")]
    RedirectDepthExceeded {
        url: String,
        depth: usize,
        max: usize,
    },

    /// Every strategy failed at the transport level.
    #[error("All {attempts} fetch strategies failed for {url} (last error: {last_error})")]
    AllStrategiesFailed {
        url: String,
        attempts: usize,
        last_error: String,
    },
}

/// Categories of transport errors, counted per strategy attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    HttpRequestBuilderError,
    HttpRequestRedirectError,
    HttpRequestTimeoutError,
    HttpRequestRequestError,
    HttpRequestConnectError,
    HttpRequestBodyError,
    HttpRequestDecodeError,
    HttpRequestOtherError,
    /// Manual redirect chase exceeded its depth limit.
    ManualRedirectLoop,
    /// A whole entry exceeded `ENTRY_PROCESSING_TIMEOUT`.
    EntryTimeout,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::HttpRequestBuilderError => "HTTP request builder error",
            ErrorType::HttpRequestRedirectError => "HTTP request redirect error",
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestRequestError => "HTTP request error",
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::HttpRequestBodyError => "HTTP request body error",
            ErrorType::HttpRequestDecodeError => "HTTP request decode error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
            ErrorType::ManualRedirectLoop => "Manual redirect loop",
            ErrorType::EntryTimeout => "Entry processing timeout",
        }
    }
}

/// Terminal outcome categories of one registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum OutcomeType {
    /// Live at its current URL.
    Unchanged,
    /// Moved; the registry entry was (or would be) rewritten.
    Updated,
    /// Redirected somewhere suspicious; old URL kept.
    Rejected,
    /// Responded, but not with 200 and without a usable redirect.
    Unhealthy,
    /// No response could be obtained.
    Failed,
    /// Entry has no usable `base_url`.
    Skipped,
}

impl OutcomeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeType::Unchanged => "Unchanged",
            OutcomeType::Updated => "Updated",
            OutcomeType::Rejected => "Rejected (suspicious redirect)",
            OutcomeType::Unhealthy => "Unhealthy (no redirect)",
            OutcomeType::Failed => "Failed",
            OutcomeType::Skipped => "Skipped (no usable base_url)",
        }
    }
}
