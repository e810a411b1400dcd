//! Classifier verdict types.

use std::fmt;

/// What to do with an observed destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The host genuinely changed and nothing looked suspicious.
    Accept,
    /// The destination looks like a block page, login wall or parked domain.
    RejectSuspicious,
    /// Same site after normalization (scheme, `www.`, path changes).
    IgnoreSameHost,
}

/// Which part of the response a rule fired on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    Path,
    Content,
    Url,
}

impl RuleScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleScope::Path => "path",
            RuleScope::Content => "content",
            RuleScope::Url => "url",
        }
    }
}

/// The rule that produced a rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRule {
    pub scope: RuleScope,
    pub marker: String,
}

impl fmt::Display for MatchedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scope.as_str(), self.marker)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectVerdict {
    pub verdict: Verdict,
    /// Set only for [`Verdict::RejectSuspicious`].
    pub matched_rule: Option<MatchedRule>,
}

impl RedirectVerdict {
    pub fn accept() -> Self {
        Self {
            verdict: Verdict::Accept,
            matched_rule: None,
        }
    }

    pub fn same_host() -> Self {
        Self {
            verdict: Verdict::IgnoreSameHost,
            matched_rule: None,
        }
    }

    pub fn reject(scope: RuleScope, marker: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::RejectSuspicious,
            matched_rule: Some(MatchedRule {
                scope,
                marker: marker.into(),
            }),
        }
    }
}
