//! Redirect classification.
//!
//! Decides whether a change of destination is a real migration or a landing
//! on a block page, login wall or parked domain. The classifier only ever
//! withholds an update; it never produces a URL of its own.

mod rules;
mod types;

use log::debug;
use url::Url;

use crate::app::{normalized_host, same_url};
use crate::config::CONTENT_INSPECTION_CHARS;

pub use rules::{load_rules, ClassifierRules, DEFAULT_CONTENT_MARKERS, DEFAULT_PATH_MARKERS};
pub use types::{MatchedRule, RedirectVerdict, RuleScope, Verdict};

/// Marker recorded when either URL cannot be parsed.
pub const UNPARSEABLE_URL_RULE: &str = "unparseable-url";

#[derive(Debug, Clone, Default)]
pub struct RedirectClassifier {
    rules: ClassifierRules,
}

impl RedirectClassifier {
    pub fn new(rules: ClassifierRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ClassifierRules {
        &self.rules
    }

    /// Classifies the move from `original_url` to `final_url`.
    ///
    /// Checks run in order: path markers on the final URL, normalized host
    /// equality, then content markers in the first
    /// [`CONTENT_INSPECTION_CHARS`] characters of `body`.
    pub fn classify(
        &self,
        original_url: &str,
        final_url: &str,
        body: Option<&str>,
    ) -> RedirectVerdict {
        let (original, destination) = match (Url::parse(original_url), Url::parse(final_url)) {
            (Ok(o), Ok(d)) => (o, d),
            _ => {
                debug!("Cannot parse {} -> {}", original_url, final_url);
                return RedirectVerdict::reject(RuleScope::Url, UNPARSEABLE_URL_RULE);
            }
        };

        if !same_url(original_url, final_url) {
            let path = destination.path().to_lowercase();
            if let Some(marker) = self.rules.path_markers.iter().find(|m| path.contains(m.as_str())) {
                return RedirectVerdict::reject(RuleScope::Path, marker.clone());
            }
        }

        match (normalized_host(&original), normalized_host(&destination)) {
            (Some(a), Some(b)) if a == b => return RedirectVerdict::same_host(),
            (Some(_), Some(_)) => {}
            _ => return RedirectVerdict::reject(RuleScope::Url, UNPARSEABLE_URL_RULE),
        }

        if let Some(body) = body {
            let head: String = body.chars().take(CONTENT_INSPECTION_CHARS).collect();
            let head = head.to_lowercase();
            if let Some(marker) = self
                .rules
                .content_markers
                .iter()
                .find(|m| head.contains(m.as_str()))
            {
                return RedirectVerdict::reject(RuleScope::Content, marker.clone());
            }
        }

        RedirectVerdict::accept()
    }
}
