//! Browser request profile.
//!
//! Header set presented by the impersonating and challenge-solving strategies.
//! It mirrors a desktop Chrome navigation request so header-based bot detection
//! sees an ordinary browser.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Accept header of a Chrome top-level navigation.
pub(crate) const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

const BROWSER_HEADERS: &[(&str, &str)] = &[
    ("accept", BROWSER_ACCEPT),
    ("accept-language", "en-US,en;q=0.9"),
    (
        "sec-ch-ua",
        "\"Google Chrome\";v=\"131\", \"Chromium\";v=\"131\", \"Not_A Brand\";v=\"24\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"Windows\""),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "none"),
    ("sec-fetch-user", "?1"),
    ("upgrade-insecure-requests", "1"),
    ("cache-control", "max-age=0"),
];

/// Returns the Chrome navigation header profile as a `HeaderMap`.
///
/// Accept-Encoding is left to reqwest, which advertises exactly the encodings
/// it was built to decode.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(BROWSER_HEADERS.len());
    for &(name, value) in BROWSER_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_headers_profile() {
        let headers = browser_headers();
        assert_eq!(headers.len(), BROWSER_HEADERS.len());
        assert_eq!(
            headers.get("sec-fetch-mode").and_then(|v| v.to_str().ok()),
            Some("navigate")
        );
        assert!(headers.get("accept-encoding").is_none());
    }
}
