//! Page fetching.
//!
//! [`Fetcher`] issues a GET through an ordered cascade of [`FetchStrategy`]
//! profiles, then chases redirects the transport could not see (a `Location`
//! header on a 200/403, a meta refresh tag) up to `MAX_MANUAL_REDIRECT_DEPTH`.

mod redirects;
mod request;
mod response;
mod strategy;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use log::debug;
use reqwest::header::HeaderMap;

use crate::app::same_url;
use crate::config::{INSPECTABLE_STATUSES, MAX_MANUAL_REDIRECT_DEPTH};
use crate::error_handling::{
    update_error_stats, ErrorType, FetchError, ProcessingStats, TransportError,
};

pub use redirects::detect_redirect;
pub use request::browser_headers;
pub use response::RawResponse;
#[cfg(feature = "challenge-solver")]
pub use strategy::ChallengeStrategy;
pub use strategy::{FetchStrategy, ImpersonateStrategy, PlainStrategy, StrategyKind};

/// Outcome of one successful fetch, after any manual redirect chase.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status_code: u16,
    /// Absolute URL after transport-level redirect following.
    pub final_url: String,
    pub headers: HeaderMap,
    /// Body, truncated for inspection.
    pub body: String,
    pub strategy_used: StrategyKind,
    /// Number of manual redirects chased to get here.
    pub redirect_depth: usize,
}

/// Anything that can fetch a page. Resolvers depend on this rather than on
/// [`Fetcher`] directly.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError>;
}

/// Strategy cascade with manual redirect chasing.
pub struct Fetcher {
    strategies: Vec<Box<dyn FetchStrategy>>,
    attempt_timeout: Duration,
    stats: Arc<ProcessingStats>,
}

impl Fetcher {
    pub fn new(
        strategies: Vec<Box<dyn FetchStrategy>>,
        attempt_timeout: Duration,
        stats: Arc<ProcessingStats>,
    ) -> Self {
        Self {
            strategies,
            attempt_timeout,
            stats,
        }
    }

    /// Strategies in the order they are tried.
    pub fn strategy_kinds(&self) -> Vec<StrategyKind> {
        self.strategies.iter().map(|s| s.kind()).collect()
    }

    /// Fetches `url` as part of a manual redirect chase at `redirect_depth`.
    ///
    /// Fails closed once `redirect_depth` exceeds `MAX_MANUAL_REDIRECT_DEPTH`.
    /// A hidden redirect found on a 200/403 response is followed recursively
    /// and the deeper result replaces this one.
    pub fn fetch_at_depth<'a>(
        &'a self,
        url: &'a str,
        redirect_depth: usize,
    ) -> BoxFuture<'a, Result<FetchResult, FetchError>> {
        Box::pin(async move {
            if redirect_depth > MAX_MANUAL_REDIRECT_DEPTH {
                self.stats.increment_error(ErrorType::ManualRedirectLoop);
                return Err(FetchError::RedirectDepthExceeded {
                    url: url.to_string(),
                    depth: redirect_depth,
                    max: MAX_MANUAL_REDIRECT_DEPTH,
                });
            }
            validate_fetch_url(url)?;

            let (response, strategy_used) = self.first_response(url).await?;
            self.stats.increment_strategy(strategy_used);

            if INSPECTABLE_STATUSES.contains(&response.status) {
                // Relative targets resolve against the requested URL, not the
                // transport's final URL.
                if let Some(target) = detect_redirect(&response, url) {
                    if !same_url(&target, url) && !same_url(&target, &response.final_url) {
                        debug!(
                            "Manual redirect {} -> {} (status {}, depth {})",
                            url, target, response.status, redirect_depth
                        );
                        return self.fetch_at_depth(&target, redirect_depth + 1).await;
                    }
                }
            }

            Ok(FetchResult {
                status_code: response.status,
                final_url: response.final_url,
                headers: response.headers,
                body: response.body,
                strategy_used,
                redirect_depth,
            })
        })
    }

    /// Walks the strategies in order and returns the first HTTP response,
    /// whatever its status.
    async fn first_response(&self, url: &str) -> Result<(RawResponse, StrategyKind), FetchError> {
        let mut attempts = 0;
        let mut last_error: Option<String> = None;

        for strategy in &self.strategies {
            attempts += 1;
            let kind = strategy.kind();
            let result = match tokio::time::timeout(self.attempt_timeout, strategy.get(url)).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::Timeout(self.attempt_timeout)),
            };

            match result {
                Ok(response) => {
                    debug!(
                        "{} strategy got {} for {} (final URL {})",
                        kind, response.status, url, response.final_url
                    );
                    return Ok((response, kind));
                }
                Err(e) => {
                    update_error_stats(&self.stats, &e);
                    debug!("{} strategy failed for {}: {}", kind, url, e);
                    last_error = Some(format!("{kind}: {e}"));
                }
            }
        }

        Err(FetchError::AllStrategiesFailed {
            url: url.to_string(),
            attempts,
            last_error: last_error.unwrap_or_else(|| "no strategy configured".to_string()),
        })
    }
}

#[async_trait]
impl PageFetcher for Fetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        self.fetch_at_depth(url, 0).await
    }
}

fn validate_fetch_url(url: &str) -> Result<(), FetchError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        scheme => Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme or missing host ({scheme})"),
        }),
    }
}
