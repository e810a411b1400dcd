//! Per-entry resolution.
//!
//! A [`Dispatcher`] routes each registry entry to the first [`Resolver`]
//! whose `matches` accepts its key. The [`GenericResolver`] (fetch, then
//! classify) handles everything no specialised resolver claims.

mod dispatch;
mod generic;
mod increment;

#[cfg(test)]
mod fake;

use std::fmt;

use async_trait::async_trait;

use crate::classify::MatchedRule;
use crate::error_handling::OutcomeType;

pub use dispatch::Dispatcher;
pub use generic::GenericResolver;
pub use increment::IncrementProbe;

/// Result of resolving one entry. Only `Updated` leads to a registry write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Still live where it is.
    Unchanged { status: u16 },
    /// Moved to `new_url` (no trailing slash); `via` names the resolver.
    Updated { new_url: String, via: String },
    /// Redirected somewhere suspicious; the old URL stays.
    Rejected { final_url: String, rule: MatchedRule },
    /// Answered with a non-200 status and no usable redirect.
    Unhealthy { status: u16 },
    /// No response could be obtained.
    Failed { reason: String },
}

impl ResolutionOutcome {
    pub fn kind(&self) -> OutcomeType {
        match self {
            ResolutionOutcome::Unchanged { .. } => OutcomeType::Unchanged,
            ResolutionOutcome::Updated { .. } => OutcomeType::Updated,
            ResolutionOutcome::Rejected { .. } => OutcomeType::Rejected,
            ResolutionOutcome::Unhealthy { .. } => OutcomeType::Unhealthy,
            ResolutionOutcome::Failed { .. } => OutcomeType::Failed,
        }
    }

    /// The URL to store, if this outcome changes the entry.
    pub fn new_url(&self) -> Option<&str> {
        match self {
            ResolutionOutcome::Updated { new_url, .. } => Some(new_url),
            _ => None,
        }
    }
}

impl fmt::Display for ResolutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionOutcome::Unchanged { status } => write!(f, "unchanged ({status})"),
            ResolutionOutcome::Updated { new_url, via } => {
                write!(f, "updated to {new_url} (via {via})")
            }
            ResolutionOutcome::Rejected { final_url, rule } => {
                write!(f, "rejected {final_url} ({rule})")
            }
            ResolutionOutcome::Unhealthy { status } => write!(f, "unhealthy ({status})"),
            ResolutionOutcome::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// One way of finding the current URL of an entry.
#[async_trait]
pub trait Resolver: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this resolver handles entries under `key`.
    fn matches(&self, key: &str) -> bool;

    async fn resolve(&self, key: &str, url: &str) -> ResolutionOutcome;
}
