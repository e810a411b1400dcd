// Shared test helpers for registry files and run configuration.

use std::path::{Path, PathBuf};

use domain_sentinel::fetch::StrategyKind;
use domain_sentinel::{Config, LogFormat, LogLevel};
use tempfile::TempDir;

/// Writes `json` as `domains.json` inside a fresh temp directory.
#[allow(dead_code)] // Used by other test files
pub fn write_registry(json: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("domains.json");
    std::fs::write(&path, json).expect("Failed to write registry");
    (dir, path)
}

#[allow(dead_code)]
pub fn read_registry(path: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path).expect("Failed to read registry");
    serde_json::from_str(&content).expect("Registry should stay valid JSON")
}

/// Config for a fast, quiet run against local mock servers.
#[allow(dead_code)]
pub fn test_config(registry: PathBuf) -> Config {
    Config {
        registry,
        log_level: LogLevel::Error,
        log_format: LogFormat::Plain,
        max_concurrency: 4,
        timeout_seconds: 5,
        user_agent: "domain_sentinel_test/1.0".to_string(),
        strategies: vec![StrategyKind::Plain],
        increment_families: Vec::new(),
        rules: None,
        dry_run: false,
        challenge_delay_ms: 0,
        show_stats: false,
    }
}
