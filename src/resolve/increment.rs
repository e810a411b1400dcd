//! Numeric-increment search across sibling hostnames.
//!
//! Some sources rotate through hosts like `site7.com`, `site8.com`, ... and
//! offer no redirect when the old one dies. The probe walks forward from the
//! current number and adopts the first sibling that answers 200.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use regex::Regex;
use url::Url;

use super::generic::log_status;
use super::{ResolutionOutcome, Resolver};
use crate::config::{HTTP_STATUS_OK, INCREMENT_PROBE_SPAN};
use crate::fetch::PageFetcher;

/// What the probe found.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ProbeResult {
    url: String,
    /// Status of the current URL, `None` if it could not be fetched.
    current_status: Option<u16>,
}

pub struct IncrementProbe {
    family: String,
    family_lower: String,
    host_pattern: Regex,
    fetcher: Arc<dyn PageFetcher>,
}

impl IncrementProbe {
    /// Creates a probe for hosts of the form `<prefix><family><digits><suffix>`.
    pub fn new(family: &str, fetcher: Arc<dyn PageFetcher>) -> Result<Self, regex::Error> {
        let host_pattern = Regex::new(&format!(
            r"(?i)^(.*?)({})(\d+)(.*)$",
            regex::escape(family)
        ))?;
        Ok(Self {
            family: family.to_string(),
            family_lower: family.to_lowercase(),
            host_pattern,
            fetcher,
        })
    }

    /// Returns the URL the family currently lives at.
    ///
    /// `current_url` if it answers 200, else the first of the next
    /// [`INCREMENT_PROBE_SPAN`] numbered siblings that does, else `current_url`.
    /// Never tries a number at or below the current one.
    pub async fn probe_increment(&self, current_url: &str) -> String {
        self.probe(current_url).await.url
    }

    async fn probe(&self, current_url: &str) -> ProbeResult {
        let current_status = match self.fetcher.fetch(current_url).await {
            Ok(result) => Some(result.status_code),
            Err(e) => {
                debug!("{} unreachable, probing siblings: {}", current_url, e);
                None
            }
        };
        let unchanged = ProbeResult {
            url: current_url.to_string(),
            current_status,
        };
        if current_status == Some(HTTP_STATUS_OK) {
            return unchanged;
        }

        let candidates = self.candidates(current_url);
        if candidates.is_empty() {
            debug!("No {} number in {}", self.family, current_url);
            return unchanged;
        }

        for candidate in candidates {
            match self.fetcher.fetch(&candidate).await {
                Ok(result) if result.status_code == HTTP_STATUS_OK => {
                    return ProbeResult {
                        url: candidate,
                        current_status,
                    };
                }
                Ok(result) => debug!("{} answered {}", candidate, result.status_code),
                Err(e) => debug!("{} failed: {}", candidate, e),
            }
        }
        unchanged
    }

    /// Sibling URLs with the family number raised by 1..=span, in order.
    fn candidates(&self, current_url: &str) -> Vec<String> {
        let Ok(url) = Url::parse(current_url) else {
            return Vec::new();
        };
        let Some(host) = url.host_str() else {
            return Vec::new();
        };
        let Some(caps) = self.host_pattern.captures(host) else {
            return Vec::new();
        };
        let (prefix, token, suffix) = (&caps[1], &caps[2], &caps[4]);
        let Ok(number) = caps[3].parse::<u64>() else {
            return Vec::new();
        };
        // Keep the caller's form for a bare root ("https://site9.com", not ".../")
        let bare_root = url.path() == "/" && !current_url.ends_with('/');

        (1..=INCREMENT_PROBE_SPAN)
            .filter_map(|i| number.checked_add(i))
            .filter_map(|n| {
                let mut candidate = url.clone();
                candidate
                    .set_host(Some(&format!("{prefix}{token}{n}{suffix}")))
                    .ok()?;
                let mut s = candidate.to_string();
                if bare_root && candidate.query().is_none() && candidate.fragment().is_none() {
                    s.truncate(s.trim_end_matches('/').len());
                }
                Some(s)
            })
            .collect()
    }
}

#[async_trait]
impl Resolver for IncrementProbe {
    fn name(&self) -> &str {
        &self.family
    }

    fn matches(&self, key: &str) -> bool {
        key.to_lowercase().contains(&self.family_lower)
    }

    async fn resolve(&self, key: &str, url: &str) -> ResolutionOutcome {
        let found = self.probe(url).await;
        if found.url != url {
            info!("[{}] {} moved: {} -> {}", key, self.family, url, found.url);
            return ResolutionOutcome::Updated {
                new_url: found.url.trim_end_matches('/').to_string(),
                via: format!("increment:{}", self.family),
            };
        }
        match found.current_status {
            Some(HTTP_STATUS_OK) => {
                log_status(key, url, HTTP_STATUS_OK);
                ResolutionOutcome::Unchanged {
                    status: HTTP_STATUS_OK,
                }
            }
            Some(status) => {
                log_status(key, url, status);
                ResolutionOutcome::Unhealthy { status }
            }
            None => {
                warn!("[{}] {} unreachable and no sibling answered", key, url);
                ResolutionOutcome::Failed {
                    reason: format!(
                        "unreachable, no {} sibling within {} answered",
                        self.family, INCREMENT_PROBE_SPAN
                    ),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::fake::ScriptedFetcher;

    fn probe(fetcher: Arc<ScriptedFetcher>) -> IncrementProbe {
        IncrementProbe::new("site", fetcher).expect("family pattern should compile")
    }

    #[tokio::test]
    async fn test_probe_walks_forward_to_first_live_sibling() {
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .page("https://site7.com", 404)
                .page("https://site8.com", 404)
                .page("https://site9.com", 200)
                .page("https://site6.com", 200),
        );
        let result = probe(fetcher.clone())
            .probe_increment("https://site7.com")
            .await;

        assert_eq!(result, "https://site9.com");
        assert_eq!(
            fetcher.calls(),
            vec![
                "https://site7.com".to_string(),
                "https://site8.com".to_string(),
                "https://site9.com".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_live_current_url_is_kept() {
        let fetcher = Arc::new(ScriptedFetcher::new().page("https://site7.com", 200));
        let p = probe(fetcher.clone());
        assert_eq!(p.probe_increment("https://site7.com").await, "https://site7.com");
        assert_eq!(fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_probe_is_bounded() {
        let fetcher = Arc::new(ScriptedFetcher::new().page("https://site7.com", 404));
        let p = probe(fetcher.clone());
        assert_eq!(p.probe_increment("https://site7.com").await, "https://site7.com");

        let calls = fetcher.calls();
        assert_eq!(calls.len(), 1 + INCREMENT_PROBE_SPAN as usize);
        assert_eq!(calls.last().map(String::as_str), Some("https://site22.com"));
    }

    #[tokio::test]
    async fn test_probe_keeps_prefix_suffix_path_and_port() {
        let fetcher = Arc::new(
            ScriptedFetcher::new().page("https://www.site12.example.org:8443/tr/?x=1", 200),
        );
        let p = probe(fetcher.clone());
        assert_eq!(
            p.probe_increment("https://www.Site11.example.org:8443/tr/?x=1")
                .await,
            "https://www.site12.example.org:8443/tr/?x=1"
        );
        assert_eq!(fetcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_host_without_family_number_is_not_probed() {
        let fetcher = Arc::new(ScriptedFetcher::new().page("https://other.com", 503));
        let p = probe(fetcher.clone());
        assert_eq!(p.probe_increment("https://other.com").await, "https://other.com");
        assert_eq!(fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_current_url_still_probes() {
        let fetcher = Arc::new(ScriptedFetcher::new().page("https://site2.com", 200));
        let p = probe(fetcher);
        assert_eq!(
            p.resolve("Site", "https://site1.com").await,
            ResolutionOutcome::Updated {
                new_url: "https://site2.com".to_string(),
                via: "increment:site".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_reports_health_when_nothing_found() {
        let fetcher = Arc::new(ScriptedFetcher::new().page("https://site1.com", 403));
        assert_eq!(
            probe(fetcher).resolve("site", "https://site1.com").await,
            ResolutionOutcome::Unhealthy { status: 403 }
        );

        let fetcher = Arc::new(ScriptedFetcher::new());
        assert!(matches!(
            probe(fetcher).resolve("site", "https://site1.com").await,
            ResolutionOutcome::Failed { .. }
        ));
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let p = probe(Arc::new(ScriptedFetcher::new()));
        assert!(p.matches("SiteTV"));
        assert!(p.matches("my-site"));
        assert!(!p.matches("other"));
    }
}
