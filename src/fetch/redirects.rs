//! Manual redirect detection.
//!
//! Transports only follow 3xx responses. Challenge pages and parked hosts often
//! answer 200 or 403 while still naming the real destination, either in a
//! `Location`/`Refresh` header or in a `<meta http-equiv="refresh">` tag. This
//! module recovers that destination.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::{HeaderMap, LOCATION, REFRESH};
use reqwest::Url;
use scraper::{Html, Selector};

use crate::fetch::response::RawResponse;

static META_HTTP_EQUIV: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("meta[http-equiv]").expect("meta http-equiv selector is valid")
});

static REFRESH_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\burl\s*=\s*["']?([^\s"'>]+)"#).expect("refresh url pattern is valid")
});

/// Finds a redirect target the transport did not follow.
///
/// Priority (first match wins):
/// 1. `Location` header, on any status, then a `Refresh: <delay>; url=<target>` header
/// 2. A meta refresh tag in the body
///
/// Relative targets are resolved against the scheme and host of `original_url`.
/// Anything malformed (non-UTF-8 header, unparseable or non-http target) is
/// treated as "no redirect" for that signal.
pub fn detect_redirect(response: &RawResponse, original_url: &str) -> Option<String> {
    if let Some(target) =
        header_value(&response.headers, LOCATION).and_then(|loc| resolve_target(loc, original_url))
    {
        return Some(target);
    }

    if let Some(target) = header_value(&response.headers, REFRESH)
        .and_then(extract_refresh_url)
        .and_then(|value| resolve_target(value, original_url))
    {
        return Some(target);
    }

    meta_refresh_target(&response.body).and_then(|value| resolve_target(&value, original_url))
}

/// Extracts the raw `url=` value of the first meta refresh tag in `body`.
///
/// The body is parsed as a document, so tags inside comments, scripts or
/// attribute values are not seen. Entities in `content` are already decoded.
pub(crate) fn meta_refresh_target(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    let target = document
        .select(&META_HTTP_EQUIV)
        .filter(|element| {
            element
                .value()
                .attr("http-equiv")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("refresh"))
        })
        .find_map(|element| element.value().attr("content").and_then(extract_refresh_url))
        .map(str::to_string);
    target
}

fn extract_refresh_url(text: &str) -> Option<&str> {
    REFRESH_URL
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn header_value(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Turns a redirect value into an absolute http(s) URL.
///
/// Relative values (`/path`, `path`, `//host/path`) are joined onto the origin
/// of `original_url`, so the original path never leaks into the target.
pub(crate) fn resolve_target(value: &str, original_url: &str) -> Option<String> {
    let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
    if value.is_empty() {
        return None;
    }

    if let Ok(absolute) = Url::parse(value) {
        return matches!(absolute.scheme(), "http" | "https").then(|| absolute.to_string());
    }

    let origin = Url::parse(original_url).ok()?.join("/").ok()?;
    origin.join(value).ok().map(|u| u.to_string())
}
