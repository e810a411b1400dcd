//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `domain_sentinel` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use domain_sentinel::initialization::{init_crypto_provider, init_logger_with};
use domain_sentinel::{run_check, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    // Must happen before the first TLS connection
    init_crypto_provider();

    let dry_run = config.dry_run;
    let registry_path = config.registry.clone();
    match run_check(config).await {
        Ok(report) => {
            println!(
                "✅ Checked {} entr{} ({} updated, {} unchanged, {} rejected, {} unhealthy, {} failed, {} skipped) in {:.1}s",
                report.total,
                if report.total == 1 { "y" } else { "ies" },
                report.updated,
                report.unchanged,
                report.rejected,
                report.unhealthy,
                report.failed,
                report.skipped,
                report.elapsed_seconds
            );
            if report.registry_written {
                println!("Registry updated: {}", registry_path.display());
            } else if dry_run && report.updated > 0 {
                println!("Dry run: {} not modified", registry_path.display());
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("domain_sentinel error: {:#}", e);
            process::exit(1);
        }
    }
}
