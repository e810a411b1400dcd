//! Suspicion markers used by the classifier.

use std::path::Path;

use serde::Deserialize;
use tokio::fs;

use crate::error_handling::RulesError;

/// Path fragments that indicate an auth wall, block page or parking page.
/// `engel` (blocked) and `giris` (login) cover localized block pages.
pub const DEFAULT_PATH_MARKERS: &[&str] = &[
    "account/login",
    "login",
    "signin",
    "sign-in",
    "sign_in",
    "engel",
    "giris",
    "suspend",
    "parking",
    "captcha",
    "forbidden",
    "access-denied",
];

/// Body phrases that indicate a parked, suspended or regulator-blocked page.
/// `tib ` and `btk ` are regulator names that appear on court-order block pages.
pub const DEFAULT_CONTENT_MARKERS: &[&str] = &[
    "domain expired",
    "domain suspended",
    "under construction",
    "site blocked",
    "this domain is for sale",
    "account suspended",
    "tib ",
    "btk ",
];

/// Ordered marker lists. All markers are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierRules {
    pub path_markers: Vec<String>,
    pub content_markers: Vec<String>,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            path_markers: DEFAULT_PATH_MARKERS.iter().map(|m| m.to_string()).collect(),
            content_markers: DEFAULT_CONTENT_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

/// On-disk shape of a rules file. Both lists are optional.
#[derive(Debug, Default, Deserialize)]
struct RulesFile {
    #[serde(default)]
    path_markers: Vec<String>,
    #[serde(default)]
    content_markers: Vec<String>,
}

impl ClassifierRules {
    /// Appends extra markers after the existing ones, skipping blanks and duplicates.
    pub fn with_extra<I, J>(mut self, path_markers: I, content_markers: J) -> Self
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        extend_markers(&mut self.path_markers, path_markers);
        extend_markers(&mut self.content_markers, content_markers);
        self
    }
}

fn extend_markers(target: &mut Vec<String>, extra: impl IntoIterator<Item = String>) {
    for marker in extra {
        let marker = marker.to_lowercase();
        // Trailing spaces are significant ("tib "), so only reject blank markers
        if marker.trim().is_empty() || target.contains(&marker) {
            continue;
        }
        target.push(marker);
    }
}

/// Loads the default rules extended by the markers in a JSON rules file
/// (`{"path_markers": [...], "content_markers": [...]}`).
pub async fn load_rules(path: &Path) -> Result<ClassifierRules, RulesError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| RulesError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let file: RulesFile = serde_json::from_str(&content).map_err(|source| RulesError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "Loaded {} extra path and {} extra content markers from {}",
        file.path_markers.len(),
        file.content_markers.len(),
        path.display()
    );
    Ok(ClassifierRules::default().with_extra(file.path_markers, file.content_markers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_keep_order() {
        let rules = ClassifierRules::default();
        assert_eq!(rules.path_markers.first().map(String::as_str), Some("account/login"));
        assert_eq!(rules.path_markers.len(), DEFAULT_PATH_MARKERS.len());
        assert!(rules.content_markers.contains(&"btk ".to_string()));
    }

    #[test]
    fn test_with_extra_appends_lowercased_without_duplicates() {
        let rules = ClassifierRules::default().with_extra(
            vec!["Blocked".to_string(), "login".to_string(), "  ".to_string()],
            vec!["Coming Soon".to_string()],
        );
        assert_eq!(rules.path_markers.last().map(String::as_str), Some("blocked"));
        assert_eq!(rules.path_markers.len(), DEFAULT_PATH_MARKERS.len() + 1);
        assert_eq!(
            rules.content_markers.last().map(String::as_str),
            Some("coming soon")
        );
    }

    #[tokio::test]
    async fn test_load_rules_from_file() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("rules.json");
        std::fs::write(&path, r#"{"path_markers": ["maintenance"]}"#)
            .expect("Failed to write rules file");

        let rules = load_rules(&path).await.expect("rules should load");
        assert!(rules.path_markers.contains(&"maintenance".to_string()));
        assert_eq!(rules.content_markers.len(), DEFAULT_CONTENT_MARKERS.len());
    }

    #[tokio::test]
    async fn test_load_rules_errors() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            load_rules(&missing).await,
            Err(RulesError::Read { .. })
        ));

        let invalid = dir.path().join("invalid.json");
        std::fs::write(&invalid, "{ not json").expect("Failed to write rules file");
        assert!(matches!(
            load_rules(&invalid).await,
            Err(RulesError::Parse { .. })
        ));
    }
}
