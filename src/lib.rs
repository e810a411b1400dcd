//! domain_sentinel library: keeps a registry of source URLs pointing at live sites
//!
//! Each registry entry is fetched through a cascade of browser-like strategies.
//! Redirects hidden behind challenge pages (a `Location` header on a 403, a meta
//! refresh tag) are chased manually, and every change of destination is
//! classified before it is adopted: moves onto parking pages, login walls or
//! regulator block pages are rejected. Families of numbered mirror hosts that
//! offer no redirect at all are recovered by probing the next numbers.
//!
//! # Example
//!
//! ```no_run
//! use domain_sentinel::{run_check, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     registry: std::path::PathBuf::from("domains.json"),
//!     max_concurrency: 4,
//!     dry_run: true,
//!     ..Default::default()
//! };
//!
//! let report = run_check(config).await?;
//! println!("Checked {} entries: {} updated, {} failed",
//!          report.total, report.updated, report.failed);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

mod app;
pub mod classify;
pub mod config;
mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod registry;
pub mod resolve;
mod user_agent;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{
    FetchError, InitializationError, OutcomeType, ProcessingStats, RegistryError, RulesError,
    TransportError,
};
pub use run::{run_check, CheckReport};

// Internal run module (loads the registry, resolves every entry, writes back)
mod run {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use anyhow::{Context, Result};
    use futures::stream::FuturesUnordered;
    use futures::StreamExt;
    use log::{debug, info, warn};

    use crate::app::{print_processing_statistics, validate_and_normalize_url};
    use crate::classify::{load_rules, ClassifierRules, RedirectClassifier};
    use crate::config::{Config, ENTRY_PROCESSING_TIMEOUT};
    use crate::error_handling::{ErrorType, OutcomeType, ProcessingStats};
    use crate::fetch::{Fetcher, PageFetcher};
    use crate::initialization::{init_semaphore, init_strategies};
    use crate::registry::Registry;
    use crate::resolve::{Dispatcher, ResolutionOutcome};

    /// Results of a registry check.
    #[derive(Debug, Clone, Default)]
    pub struct CheckReport {
        /// Entries in the registry
        pub total: usize,
        /// Entries that moved (written unless `dry_run`)
        pub updated: usize,
        pub unchanged: usize,
        /// Entries whose redirect looked suspicious
        pub rejected: usize,
        pub unhealthy: usize,
        pub failed: usize,
        /// Entries without a usable `base_url`
        pub skipped: usize,
        /// Whether the registry file was rewritten
        pub registry_written: bool,
        pub elapsed_seconds: f64,
    }

    impl CheckReport {
        fn record(&mut self, outcome: OutcomeType) {
            match outcome {
                OutcomeType::Unchanged => self.unchanged += 1,
                OutcomeType::Updated => self.updated += 1,
                OutcomeType::Rejected => self.rejected += 1,
                OutcomeType::Unhealthy => self.unhealthy += 1,
                OutcomeType::Failed => self.failed += 1,
                OutcomeType::Skipped => self.skipped += 1,
            }
        }
    }

    /// Checks every entry of the registry and persists the moves it finds.
    ///
    /// Entries are resolved concurrently (bounded by `max_concurrency`). The
    /// registry is only touched after every entry finished, and only written
    /// when at least one entry changed and `dry_run` is off.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be read or parsed, the rules
    /// file is invalid, no fetch strategy could be built, or the updated
    /// registry cannot be written. Per-entry failures are not errors.
    pub async fn run_check(config: Config) -> Result<CheckReport> {
        let start_time = Instant::now();
        if let Some(warning) = config.timeout_warning() {
            warn!("{warning}");
        }

        let mut registry = Registry::load(&config.registry)
            .await
            .context("Failed to load registry")?;
        info!(
            "Loaded {} entries from {}",
            registry.len(),
            config.registry.display()
        );
        if registry.is_empty() {
            warn!("Registry {} has no entries", config.registry.display());
        }

        let rules = match &config.rules {
            Some(path) => load_rules(path)
                .await
                .context("Failed to load classifier rules")?,
            None => ClassifierRules::default(),
        };

        let stats = Arc::new(ProcessingStats::new());
        let strategies = init_strategies(&config).context("Failed to initialize fetch strategies")?;
        let fetcher = Fetcher::new(
            strategies,
            Duration::from_secs(config.timeout_seconds),
            Arc::clone(&stats),
        );
        info!(
            "Fetch strategies: {}",
            fetcher
                .strategy_kinds()
                .iter()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(" -> ")
        );
        let fetcher: Arc<dyn PageFetcher> = Arc::new(fetcher);
        let classifier = Arc::new(RedirectClassifier::new(rules));
        debug!(
            "Classifier markers: {} path, {} content",
            classifier.rules().path_markers.len(),
            classifier.rules().content_markers.len()
        );
        let dispatcher = Arc::new(
            Dispatcher::with_increment_families(
                fetcher,
                classifier,
                &config.increment_families,
            )
            .context("Invalid increment family")?,
        );

        let mut report = CheckReport {
            total: registry.len(),
            ..Default::default()
        };
        let semaphore = init_semaphore(config.max_concurrency);
        let mut tasks = FuturesUnordered::new();

        for entry in registry.entries() {
            let Some(url) = entry.base_url.as_deref().and_then(validate_and_normalize_url) else {
                debug!("[{}] No usable base_url, skipping", entry.key);
                stats.increment_outcome(OutcomeType::Skipped);
                report.record(OutcomeType::Skipped);
                continue;
            };

            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    warn!("Semaphore closed, skipping entry: {}", entry.key);
                    continue;
                }
            };

            let dispatcher = Arc::clone(&dispatcher);
            let stats = Arc::clone(&stats);
            let key = entry.key;
            tasks.push(tokio::spawn(async move {
                let _permit = permit;
                let outcome =
                    match tokio::time::timeout(ENTRY_PROCESSING_TIMEOUT, dispatcher.resolve(&key, &url))
                        .await
                    {
                        Ok(outcome) => outcome,
                        Err(_) => {
                            stats.increment_error(ErrorType::EntryTimeout);
                            warn!(
                                "[{}] Resolution timed out after {}s",
                                key,
                                ENTRY_PROCESSING_TIMEOUT.as_secs()
                            );
                            ResolutionOutcome::Failed {
                                reason: format!(
                                    "timed out after {}s",
                                    ENTRY_PROCESSING_TIMEOUT.as_secs()
                                ),
                            }
                        }
                    };
                (key, outcome)
            }));
        }

        let mut updates = Vec::new();
        while let Some(joined) = tasks.next().await {
            let (key, outcome) = match joined {
                Ok(result) => result,
                Err(e) => {
                    warn!("Entry task did not complete: {e}");
                    stats.increment_outcome(OutcomeType::Failed);
                    report.record(OutcomeType::Failed);
                    continue;
                }
            };
            debug!("[{}] {}", key, outcome);
            stats.increment_outcome(outcome.kind());
            report.record(outcome.kind());
            if let Some(new_url) = outcome.new_url() {
                updates.push((key, new_url.to_string()));
            }
        }

        let mut changed = 0;
        for (key, new_url) in &updates {
            if config.dry_run {
                info!("[dry-run] Would update {} -> {}", key, new_url);
            } else if registry.apply_update(key, new_url) {
                changed += 1;
            }
        }

        if changed > 0 {
            let path = config.registry.clone();
            tokio::task::spawn_blocking(move || registry.save(&path))
                .await
                .context("Registry write task panicked")?
                .context("Failed to write registry")?;
            report.registry_written = true;
            info!(
                "Updated {} entr{} in {}",
                changed,
                if changed == 1 { "y" } else { "ies" },
                config.registry.display()
            );
        } else if updates.is_empty() {
            info!("No updates were necessary");
        }

        if config.show_stats {
            print_processing_statistics(&stats);
        }

        report.elapsed_seconds = start_time.elapsed().as_secs_f64();
        Ok(report)
    }
}
