//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_CHALLENGE_DELAY_MS, DEFAULT_MAX_CONCURRENCY, DEFAULT_REGISTRY_PATH,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, RECOMMENDED_TIMEOUT_SECS,
};
use crate::fetch::StrategyKind;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Run configuration.
///
/// Parsed from the command line by the binary, or built programmatically by
/// library users starting from [`Config::default`].
///
/// # Examples
///
/// ```bash
/// # Check every entry of domains.json
/// domain_sentinel domains.json
///
/// # Sequential checks, increment probing for the "dizibox" family, no writes
/// domain_sentinel domains.json --max-concurrency 1 --increment-family dizibox --dry-run
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "domain_sentinel",
    about = "Verifies registry base URLs and follows sites that moved to a new domain."
)]
pub struct Config {
    /// Registry JSON file (key -> { base_url, icon_url, ... })
    #[arg(value_parser, default_value = DEFAULT_REGISTRY_PATH)]
    pub registry: PathBuf,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Maximum number of entries checked concurrently (1 = sequential)
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Per-attempt timeout in seconds (15 to 30 recommended)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_seconds: u64,

    /// User-Agent presented by the challenge and impersonation strategies
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Fetch strategies in priority order (repeat the flag; default: all, best first)
    #[arg(long = "strategy", value_enum)]
    pub strategies: Vec<StrategyKind>,

    /// Source family whose hostnames carry a rotating counter (repeatable)
    ///
    /// Keys containing the family name are resolved by probing successor
    /// hostnames (`<family>N+1`, `<family>N+2`, ...) instead of following redirects.
    #[arg(long = "increment-family")]
    pub increment_families: Vec<String>,

    /// JSON file with extra classifier markers: {"path_markers": [...], "content_markers": [...]}
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Report changes without writing the registry
    #[arg(long)]
    pub dry_run: bool,

    /// Wait before replaying a request after a cookie challenge, in milliseconds
    #[arg(long, default_value_t = DEFAULT_CHALLENGE_DELAY_MS)]
    pub challenge_delay_ms: u64,

    /// Print per-outcome, per-strategy and per-error counters at the end of the run
    #[arg(long)]
    pub show_stats: bool,
}

impl Config {
    /// Strategies to use, in priority order.
    ///
    /// An empty `--strategy` list means every strategy in its default order.
    /// Duplicates keep their first position.
    pub fn strategy_order(&self) -> Vec<StrategyKind> {
        if self.strategies.is_empty() {
            return StrategyKind::default_order();
        }
        let mut order = Vec::with_capacity(self.strategies.len());
        for kind in &self.strategies {
            if !order.contains(kind) {
                order.push(*kind);
            }
        }
        order
    }

    /// Warning text when the per-attempt timeout is outside the recommended range.
    pub fn timeout_warning(&self) -> Option<String> {
        if RECOMMENDED_TIMEOUT_SECS.contains(&self.timeout_seconds) {
            return None;
        }
        Some(format!(
            "Timeout of {}s is outside the recommended {}..={}s; challenge pages may be cut off or dead hosts may stall the run",
            self.timeout_seconds,
            RECOMMENDED_TIMEOUT_SECS.start(),
            RECOMMENDED_TIMEOUT_SECS.end()
        ))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: PathBuf::from(DEFAULT_REGISTRY_PATH),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            strategies: Vec::new(),
            increment_families: Vec::new(),
            rules: None,
            dry_run: false,
            challenge_delay_ms: DEFAULT_CHALLENGE_DELAY_MS,
            show_stats: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_concurrency, 10);
        assert_eq!(config.timeout_seconds, 20);
        assert_eq!(config.registry, PathBuf::from("domains.json"));
        assert!(config.increment_families.is_empty());
        assert!(!config.dry_run);
        assert!(config.rules.is_none());
    }

    #[test]
    fn test_strategy_order_defaults_to_all() {
        let config = Config::default();
        assert_eq!(config.strategy_order(), StrategyKind::default_order());
    }

    #[test]
    fn test_strategy_order_dedups_and_keeps_priority() {
        let config = Config {
            strategies: vec![
                StrategyKind::Plain,
                StrategyKind::Impersonate,
                StrategyKind::Plain,
            ],
            ..Default::default()
        };
        assert_eq!(
            config.strategy_order(),
            vec![StrategyKind::Plain, StrategyKind::Impersonate]
        );
    }

    #[test]
    fn test_cli_parsing() {
        let config = Config::try_parse_from([
            "domain_sentinel",
            "sites.json",
            "--max-concurrency",
            "1",
            "--strategy",
            "plain",
            "--increment-family",
            "dizibox",
            "--dry-run",
        ])
        .expect("arguments should parse");

        assert_eq!(config.registry, PathBuf::from("sites.json"));
        assert_eq!(config.max_concurrency, 1);
        assert_eq!(config.strategies, vec![StrategyKind::Plain]);
        assert_eq!(config.increment_families, vec!["dizibox".to_string()]);
        assert!(config.dry_run);
    }

    #[test]
    fn test_cli_registry_defaults() {
        let config = Config::try_parse_from(["domain_sentinel"]).expect("defaults should parse");
        assert_eq!(config.registry, PathBuf::from("domains.json"));
        assert_eq!(config.timeout_seconds, 20);
    }

    #[test]
    fn test_cli_rejects_zero_timeout() {
        let result = Config::try_parse_from(["domain_sentinel", "--timeout-seconds", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_timeout_warning_outside_recommended_range() {
        let config = Config::default();
        assert!(config.timeout_warning().is_none());

        for seconds in [15, 30] {
            let config = Config {
                timeout_seconds: seconds,
                ..Default::default()
            };
            assert!(config.timeout_warning().is_none(), "{seconds}s is in range");
        }

        let short = Config {
            timeout_seconds: 5,
            ..Default::default()
        };
        let warning = short.timeout_warning().expect("5s should warn");
        assert!(warning.contains("5s"));

        let long = Config {
            timeout_seconds: 60,
            ..Default::default()
        };
        assert!(long.timeout_warning().is_some());
    }
}
