//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources of a run:
//! - Fetch strategies and their HTTP clients
//! - Logger
//! - Concurrency semaphore
//! - TLS crypto provider

mod client;
mod logger;

use std::sync::Arc;

use rustls::crypto::{ring::default_provider, CryptoProvider};
use tokio::sync::Semaphore;

// Re-export public API
pub use client::{init_impersonate_client, init_plain_client, init_strategies};
#[cfg(feature = "challenge-solver")]
pub use client::init_challenge_client;
pub use logger::init_logger_with;

/// Initializes a semaphore bounding the number of entries checked concurrently.
///
/// A count of 0 is treated as 1 so a run can never stall.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count.max(1)))
}

/// Initializes the crypto provider for TLS operations.
///
/// Must run before the first rustls connection is made.
pub fn init_crypto_provider() {
    // The return value is ignored because reinstalling the provider is harmless
    let _ = CryptoProvider::install_default(default_provider());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_semaphore_never_zero() {
        assert_eq!(init_semaphore(0).available_permits(), 1);
        assert_eq!(init_semaphore(10).available_permits(), 10);
    }
}
