//! Plain fallback strategy: bare client, spoofed browser User-Agent.

use async_trait::async_trait;

use super::{FetchStrategy, StrategyKind};
use crate::error_handling::TransportError;
use crate::fetch::request::BROWSER_ACCEPT;
use crate::fetch::response::{read_response, RawResponse};
use crate::user_agent::random_user_agent;

/// Last-resort strategy.
///
/// Uses a client without the Chrome header profile and a User-Agent picked
/// per request from a pool of desktop browsers, so it still looks different
/// from the other two profiles when they have been fingerprinted and blocked.
pub struct PlainStrategy {
    client: reqwest::Client,
}

impl PlainStrategy {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FetchStrategy for PlainStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Plain
    }

    async fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, random_user_agent())
            .header(reqwest::header::ACCEPT, BROWSER_ACCEPT)
            .send()
            .await?;
        Ok(read_response(response).await?)
    }
}
