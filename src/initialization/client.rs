//! HTTP client and fetch strategy initialization.
//!
//! Each strategy gets its own `reqwest::Client` so connection pools, cookie
//! jars and TLS settings never leak between identity profiles.

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::ClientBuilder;

use crate::config::{Config, MAX_REDIRECT_HOPS};
use crate::error_handling::InitializationError;
use crate::fetch::{browser_headers, FetchStrategy, ImpersonateStrategy, PlainStrategy, StrategyKind};

/// Client for the impersonating strategy.
///
/// rustls backend, Chrome header profile as default headers, HTTP/2 via ALPN,
/// protocol redirects followed up to `MAX_REDIRECT_HOPS`.
pub fn init_impersonate_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .use_rustls_tls()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .default_headers(browser_headers())
        .redirect(Policy::limited(MAX_REDIRECT_HOPS))
        .http2_adaptive_window(true)
        .build()
}

/// Client for the plain fallback strategy.
///
/// No default headers or TLS tuning; the strategy sets a rotating
/// User-Agent per request.
pub fn init_plain_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .redirect(Policy::limited(MAX_REDIRECT_HOPS))
        .build()
}

/// Client for the challenge-solving strategy (cookie store enabled).
#[cfg(feature = "challenge-solver")]
pub fn init_challenge_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .use_rustls_tls()
        .cookie_store(true)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .default_headers(browser_headers())
        .redirect(Policy::limited(MAX_REDIRECT_HOPS))
        .build()
}

fn build_strategy(
    kind: StrategyKind,
    config: &Config,
) -> Result<Option<Box<dyn FetchStrategy>>, reqwest::Error> {
    let strategy: Box<dyn FetchStrategy> = match kind {
        #[cfg(feature = "challenge-solver")]
        StrategyKind::Challenge => Box::new(crate::fetch::ChallengeStrategy::new(
            init_challenge_client(config)?,
            Duration::from_millis(config.challenge_delay_ms),
            Duration::from_secs(config.timeout_seconds),
        )),
        #[cfg(not(feature = "challenge-solver"))]
        StrategyKind::Challenge => return Ok(None),
        StrategyKind::Impersonate => Box::new(ImpersonateStrategy::new(init_impersonate_client(
            config,
        )?)),
        StrategyKind::Plain => Box::new(PlainStrategy::new(init_plain_client(config)?)),
    };
    Ok(Some(strategy))
}

/// Builds the prioritized strategy list from the configuration.
///
/// Providers that are not compiled in or whose client fails to build are
/// logged and skipped; the list only has to contain one usable strategy.
///
/// # Errors
///
/// Returns `InitializationError::NoStrategiesError` if no strategy could be built.
pub fn init_strategies(config: &Config) -> Result<Vec<Box<dyn FetchStrategy>>, InitializationError> {
    let requested = config.strategy_order();
    let mut strategies = Vec::with_capacity(requested.len());

    for kind in &requested {
        match build_strategy(*kind, config) {
            Ok(Some(strategy)) => strategies.push(strategy),
            Ok(None) => log::info!("{} strategy not compiled in, skipping", kind),
            Err(e) => log::warn!("Failed to build {} strategy, skipping: {}", kind, e),
        }
    }

    if strategies.is_empty() {
        let names: Vec<&str> = requested.iter().map(|k| k.as_str()).collect();
        return Err(InitializationError::NoStrategiesError(names.join(",")));
    }
    Ok(strategies)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_strategies_respects_order() {
        let config = Config {
            strategies: vec![StrategyKind::Plain, StrategyKind::Impersonate],
            ..Default::default()
        };
        let strategies = init_strategies(&config).expect("clients build");
        let kinds: Vec<StrategyKind> = strategies.iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, vec![StrategyKind::Plain, StrategyKind::Impersonate]);
    }

    #[cfg(feature = "challenge-solver")]
    #[test]
    fn test_init_strategies_default_has_all_providers() {
        let strategies = init_strategies(&Config::default()).expect("clients build");
        assert_eq!(strategies.len(), 3);
        assert_eq!(strategies[0].kind(), StrategyKind::Challenge);
    }
}
