//! Fetch-then-classify resolution.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};

use super::{ResolutionOutcome, Resolver};
use crate::app::same_url;
use crate::classify::{RedirectClassifier, Verdict};
use crate::config::{HTTP_STATUS_FORBIDDEN, HTTP_STATUS_OK, HTTP_STATUS_SERVICE_UNAVAILABLE};
use crate::fetch::PageFetcher;

pub struct GenericResolver {
    fetcher: Arc<dyn PageFetcher>,
    classifier: Arc<RedirectClassifier>,
}

impl GenericResolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>, classifier: Arc<RedirectClassifier>) -> Self {
        Self {
            fetcher,
            classifier,
        }
    }
}

#[async_trait]
impl Resolver for GenericResolver {
    fn name(&self) -> &str {
        "generic"
    }

    fn matches(&self, _key: &str) -> bool {
        true
    }

    async fn resolve(&self, key: &str, url: &str) -> ResolutionOutcome {
        let result = match self.fetcher.fetch(url).await {
            Ok(result) => result,
            Err(e) => {
                warn!("[{}] Could not reach {}: {}", key, url, e);
                return ResolutionOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };
        let status = result.status_code;

        if same_url(&result.final_url, url) {
            log_status(key, url, status);
            return if status == HTTP_STATUS_OK {
                ResolutionOutcome::Unchanged { status }
            } else {
                ResolutionOutcome::Unhealthy { status }
            };
        }

        let verdict = self
            .classifier
            .classify(url, &result.final_url, Some(&result.body));
        match (verdict.verdict, verdict.matched_rule) {
            (Verdict::Accept, _) => {
                let new_url = result.final_url.trim_end_matches('/').to_string();
                info!("[{}] Moved: {} -> {}", key, url, new_url);
                ResolutionOutcome::Updated {
                    new_url,
                    via: self.name().to_string(),
                }
            }
            (Verdict::IgnoreSameHost, _) => {
                debug!(
                    "[{}] Same host after redirect: {} -> {}",
                    key, url, result.final_url
                );
                log_status(key, url, status);
                ResolutionOutcome::Unchanged { status }
            }
            (Verdict::RejectSuspicious, Some(rule)) => {
                warn!(
                    "[{}] Suspicious redirect {} -> {} ({}), keeping old URL",
                    key, url, result.final_url, rule
                );
                ResolutionOutcome::Rejected {
                    final_url: result.final_url,
                    rule,
                }
            }
            (Verdict::RejectSuspicious, None) => ResolutionOutcome::Failed {
                reason: format!("suspicious redirect to {} without rule", result.final_url),
            },
        }
    }
}

/// Logs the health of an entry that did not move.
pub(crate) fn log_status(key: &str, url: &str, status: u16) {
    match status {
        HTTP_STATUS_OK => debug!("[{}] OK: {}", key, url),
        HTTP_STATUS_FORBIDDEN | HTTP_STATUS_SERVICE_UNAVAILABLE => warn!(
            "[{}] {} returned {} (protection page, no working redirect)",
            key, url, status
        ),
        other => warn!("[{}] {} returned {}", key, url, other),
    }
}
