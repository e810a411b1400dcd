//! Scripted [`PageFetcher`] for resolver tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::header::HeaderMap;

use crate::error_handling::FetchError;
use crate::fetch::{FetchResult, PageFetcher, StrategyKind};

/// Answers from a fixed table keyed by URL; unknown URLs fail at the
/// transport level. Every requested URL is recorded in order.
#[derive(Default)]
pub(crate) struct ScriptedFetcher {
    pages: HashMap<String, (u16, String, String)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// `url` answers `status` without moving.
    pub(crate) fn page(self, url: &str, status: u16) -> Self {
        self.page_with(url, status, url, "<html></html>")
    }

    /// `url` answers `status` at `final_url` with `body`.
    pub(crate) fn page_with(mut self, url: &str, status: u16, final_url: &str, body: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            (status, final_url.to_string(), body.to_string()),
        );
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_string());
        }
        match self.pages.get(url) {
            Some((status, final_url, body)) => Ok(FetchResult {
                status_code: *status,
                final_url: final_url.clone(),
                headers: HeaderMap::new(),
                body: body.clone(),
                strategy_used: StrategyKind::Plain,
                redirect_depth: 0,
            }),
            None => Err(FetchError::AllStrategiesFailed {
                url: url.to_string(),
                attempts: 1,
                last_error: "plain: connection refused".to_string(),
            }),
        }
    }
}
