//! Fetch strategies.
//!
//! A strategy is one transport/identity profile for issuing a GET. The fetcher
//! walks an ordered list of them and keeps the first one that gets any HTTP
//! response back. Providers that are not compiled in (see the
//! `challenge-solver` feature) are skipped when the list is built.

#[cfg(feature = "challenge-solver")]
mod challenge;
mod impersonate;
mod plain;

use async_trait::async_trait;
use clap::ValueEnum;
use strum_macros::EnumIter as EnumIterMacro;

use crate::error_handling::TransportError;
use crate::fetch::response::RawResponse;

#[cfg(feature = "challenge-solver")]
pub use challenge::ChallengeStrategy;
pub use impersonate::ImpersonateStrategy;
pub use plain::PlainStrategy;

/// Identifies a fetch strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro, ValueEnum)]
pub enum StrategyKind {
    /// Cookie-aware client that replays the request once after a simple bot challenge.
    Challenge,
    /// rustls client presenting a full Chrome navigation header profile.
    Impersonate,
    /// Plain client with a spoofed desktop browser User-Agent.
    Plain,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Challenge => "challenge",
            StrategyKind::Impersonate => "impersonate",
            StrategyKind::Plain => "plain",
        }
    }

    /// Default priority: most capable first, plainest last.
    pub fn default_order() -> Vec<StrategyKind> {
        vec![
            StrategyKind::Challenge,
            StrategyKind::Impersonate,
            StrategyKind::Plain,
        ]
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One transport/identity profile for issuing GET requests.
///
/// Implementations follow protocol redirects themselves and must return any
/// HTTP response they get, whatever its status: a 403 challenge page is still
/// useful input for manual redirect detection. The fetcher cuts every call off
/// after the per-attempt timeout.
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Issues a GET for `url`.
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError>;
}
