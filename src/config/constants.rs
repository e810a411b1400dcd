//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including timeouts, search bounds, and size limits.

use std::time::Duration;

/// Default number of registry entries checked concurrently (semaphore limit).
/// Set to 1 to check entries strictly one after another.
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Default per-attempt HTTP timeout in seconds.
/// Every fetch strategy attempt is bounded by this, both on the client and by a
/// hard `tokio::time::timeout` around the whole attempt.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
/// Recommended range for the per-attempt timeout. Shorter cuts off slow
/// challenge pages, longer stalls the run on dead hosts.
pub const RECOMMENDED_TIMEOUT_SECS: std::ops::RangeInclusive<u64> = 15..=30;

/// Upper bound for a single entry's whole resolution (fetch cascade, redirect
/// chase and increment probing included).
pub const ENTRY_PROCESSING_TIMEOUT: Duration = Duration::from_secs(300);

/// Default registry file.
pub const DEFAULT_REGISTRY_PATH: &str = "domains.json";

/// Default User-Agent string for HTTP requests.
///
/// Users can override this via the `--user-agent` CLI flag. The plain fallback
/// strategy rotates through [`crate::user_agent::BROWSER_USER_AGENTS`] instead.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Redirect handling
/// Maximum number of protocol (3xx) redirect hops a transport follows on its own.
pub const MAX_REDIRECT_HOPS: usize = 10;
/// Maximum depth of manual redirects (Location on non-3xx, meta refresh) chased
/// by the fetcher. A fetch at a depth above this fails closed.
pub const MAX_MANUAL_REDIRECT_DEPTH: usize = 5;
/// Status codes whose responses are inspected for hidden redirects.
/// Other statuses are assumed to carry no actionable signal.
pub const INSPECTABLE_STATUSES: &[u16] = &[200, 403];

// Response and body size limits
/// Maximum response body size in bytes (2MB).
/// Bodies are truncated at this size before inspection.
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;
/// Number of leading body characters scanned for parking/block markers.
pub const CONTENT_INSPECTION_CHARS: usize = 5000;

// Numeric increment probe
/// Number of successor hostnames tried by the increment probe (`N+1 ..= N+15`).
pub const INCREMENT_PROBE_SPAN: u64 = 15;

// Challenge solver
/// Default wait before replaying a request after a cookie challenge, in milliseconds.
pub const DEFAULT_CHALLENGE_DELAY_MS: u64 = 4000;

// Favicon service
/// Favicon service URL template; `{host}` is replaced by the bare host.
pub const FAVICON_SERVICE_TEMPLATE: &str = "https://www.google.com/s2/favicons?domain={host}&sz=128";

// HTTP status codes (for clarity and consistency)
pub const HTTP_STATUS_OK: u16 = 200;
pub const HTTP_STATUS_FORBIDDEN: u16 = 403;
pub const HTTP_STATUS_SERVICE_UNAVAILABLE: u16 = 503;
