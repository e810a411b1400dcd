//! URL validation and normalization utilities.

use log::warn;

use crate::config::FAVICON_SERVICE_TEMPLATE;

/// Maximum URL length (2048 characters), matching common browser and server limits.
const MAX_URL_LENGTH: usize = 2048;

/// Validates and normalizes a registry URL.
///
/// Adds an `https://` prefix if no scheme is present, then checks that the
/// result is a syntactically valid absolute URL with an `http`/`https` scheme
/// and a host. Logs a warning and returns `None` otherwise.
pub fn validate_and_normalize_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    if url.len() > MAX_URL_LENGTH {
        warn!(
            "Skipping URL exceeding maximum length ({} > {}): {}...",
            url.len(),
            MAX_URL_LENGTH,
            url.chars().take(50).collect::<String>()
        );
        return None;
    }

    let normalized = if !url.starts_with("http://") && !url.starts_with("https://") {
        format!("https://{url}")
    } else {
        url.to_string()
    };

    match url::Url::parse(&normalized) {
        Ok(parsed) => match (parsed.scheme(), parsed.host_str()) {
            ("http" | "https", Some(_)) => Some(normalized),
            _ => {
                warn!("Skipping unsupported scheme or hostless URL: {url}");
                None
            }
        },
        Err(_) => {
            warn!("Skipping invalid URL: {url}");
            None
        }
    }
}

/// Compares two URLs ignoring trailing slashes.
pub fn same_url(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}

/// Host identity used to decide whether a site moved.
///
/// Lower-cased host with one leading `www.` removed, plus the port when it is
/// not the scheme default. Scheme and path are ignored.
pub fn normalized_host(url: &url::Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    })
}

/// Favicon service URL for the host of `url` (leading `www.` removed).
pub fn favicon_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    Some(FAVICON_SERVICE_TEMPLATE.replace("{host}", host))
}
