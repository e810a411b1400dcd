//! Cookie challenge solver.
//!
//! Many anti-bot front ends answer the first request with a 403/503 interstitial
//! that sets a clearance cookie and expects the browser to come back after a
//! short wait. This strategy plays that part: it keeps a cookie jar, waits, and
//! replays the request once. JavaScript challenges are out of reach.
//!
//! The first request, the wait and the replay all share one attempt budget.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::SET_COOKIE;

use super::{FetchStrategy, StrategyKind};
use crate::error_handling::TransportError;
use crate::fetch::response::{read_response, RawResponse};

/// Lower-cased body fragments of common interstitial challenge pages.
const CHALLENGE_MARKERS: &[&str] = &[
    "just a moment",
    "checking your browser",
    "cf-chl",
    "challenge-platform",
    "ddos-guard",
    "please wait while we verify",
];

/// Statuses used by interstitial challenge pages.
const CHALLENGE_STATUSES: &[u16] = &[403, 429, 503];

/// Least time worth giving the replay once the wait is over.
const MIN_REPLAY_WINDOW: Duration = Duration::from_secs(1);

/// Cookie-aware strategy that solves simple clearance-cookie challenges.
pub struct ChallengeStrategy {
    client: reqwest::Client,
    delay: Duration,
    budget: Duration,
}

impl ChallengeStrategy {
    /// `client` must have its cookie store enabled. `budget` is the whole
    /// attempt timeout; the replay is skipped when it cannot fit.
    pub fn new(client: reqwest::Client, delay: Duration, budget: Duration) -> Self {
        Self {
            client,
            delay,
            budget,
        }
    }

    /// Time left for the replay after waiting, if enough remains.
    fn replay_window(&self, elapsed: Duration) -> Option<Duration> {
        let remaining = self.budget.checked_sub(elapsed)?.checked_sub(self.delay)?;
        (remaining >= MIN_REPLAY_WINDOW).then_some(remaining)
    }

    async fn send(&self, url: &str) -> Result<RawResponse, TransportError> {
        let response = self.client.get(url).send().await?;
        Ok(read_response(response).await?)
    }
}

/// True for an interstitial that handed out a cookie and asked us to come back.
pub(crate) fn is_cookie_challenge(response: &RawResponse) -> bool {
    if !CHALLENGE_STATUSES.contains(&response.status) || !response.headers.contains_key(SET_COOKIE)
    {
        return false;
    }
    let head: String = response.body.chars().take(20_000).collect::<String>().to_lowercase();
    CHALLENGE_MARKERS.iter().any(|marker| head.contains(marker))
}

#[async_trait]
impl FetchStrategy for ChallengeStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Challenge
    }

    async fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
        let started = Instant::now();
        let first = self.send(url).await?;
        if !is_cookie_challenge(&first) {
            return Ok(first);
        }

        let Some(window) = self.replay_window(started.elapsed()) else {
            log::debug!(
                "Cookie challenge at {} (status {}), no time left to replay",
                first.final_url,
                first.status
            );
            return Ok(first);
        };
        log::debug!(
            "Cookie challenge at {} (status {}), replaying in {:?}",
            first.final_url,
            first.status,
            self.delay
        );
        tokio::time::sleep(self.delay).await;

        match tokio::time::timeout(window, self.send(url)).await {
            Ok(Ok(second)) => Ok(second),
            Ok(Err(e)) => {
                log::debug!("Challenge replay failed for {}: {}", url, e);
                Ok(first)
            }
            Err(_) => {
                log::debug!("Challenge replay for {} timed out after {:?}", url, window);
                Ok(first)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn raw(status: u16, cookie: bool, body: &str) -> RawResponse {
        let mut headers = HeaderMap::new();
        if cookie {
            headers.insert(SET_COOKIE, HeaderValue::from_static("cf_clearance=abc; Path=/"));
        }
        RawResponse {
            status,
            final_url: "https://site.com/".to_string(),
            headers,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_detects_cookie_challenge() {
        assert!(is_cookie_challenge(&raw(
            503,
            true,
            "<title>Just a moment...</title>"
        )));
    }

    fn strategy(delay: Duration, budget: Duration) -> ChallengeStrategy {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("client should build");
        ChallengeStrategy::new(client, delay, budget)
    }

    #[test]
    fn test_replay_window_stays_within_budget() {
        let s = strategy(Duration::from_secs(4), Duration::from_secs(20));
        assert_eq!(
            s.replay_window(Duration::from_secs(2)),
            Some(Duration::from_secs(14))
        );
        assert_eq!(s.replay_window(Duration::from_millis(15_500)), None);
        assert_eq!(s.replay_window(Duration::from_secs(25)), None);
    }

    fn challenge_page() -> ResponseTemplate {
        ResponseTemplate::new(503)
            .insert_header("set-cookie", "cf_clearance=abc; Path=/")
            .set_body_string("<title>Just a moment...</title>")
    }

    #[tokio::test]
    async fn test_challenge_is_replayed_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(challenge_page())
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("welcome"))
            .expect(1)
            .mount(&server)
            .await;

        let response = strategy(Duration::from_millis(10), Duration::from_secs(5))
            .get(&format!("{}/", server.uri()))
            .await
            .expect("challenge should be solved");

        assert_eq!(response.status, 200);
        assert_eq!(response.body, "welcome");
    }

    #[tokio::test]
    async fn test_challenge_without_time_left_returns_first_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(challenge_page())
            .expect(1)
            .mount(&server)
            .await;

        let response = strategy(Duration::from_secs(10), Duration::from_secs(5))
            .get(&format!("{}/", server.uri()))
            .await
            .expect("first response is kept");

        assert_eq!(response.status, 503);
    }

    #[tokio::test]
    async fn test_slow_replay_falls_back_to_first_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(challenge_page())
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
            .mount(&server)
            .await;

        let started = Instant::now();
        let response = strategy(Duration::from_millis(10), Duration::from_millis(1500))
            .get(&format!("{}/", server.uri()))
            .await
            .expect("first response is kept");

        assert_eq!(response.status, 503);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_requires_cookie_marker_and_status() {
        assert!(!is_cookie_challenge(&raw(503, false, "Just a moment")));
        assert!(!is_cookie_challenge(&raw(200, true, "Just a moment")));
        assert!(!is_cookie_challenge(&raw(403, true, "Forbidden")));
    }
}
