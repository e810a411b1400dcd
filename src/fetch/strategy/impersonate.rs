//! Browser-impersonating strategy.

use async_trait::async_trait;

use super::{FetchStrategy, StrategyKind};
use crate::error_handling::TransportError;
use crate::fetch::response::{read_response, RawResponse};

/// rustls client configured to look like desktop Chrome.
///
/// The client carries the Chrome navigation header profile as default headers
/// and negotiates HTTP/2 over ALPN like a browser does (see
/// `initialization::init_impersonate_client`). JA3 fingerprinting will still
/// identify rustls; the header profile covers header-based detection only.
pub struct ImpersonateStrategy {
    client: reqwest::Client,
}

impl ImpersonateStrategy {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FetchStrategy for ImpersonateStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Impersonate
    }

    async fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::REFERER, "https://www.google.com/")
            .send()
            .await?;
        Ok(read_response(response).await?)
    }
}
