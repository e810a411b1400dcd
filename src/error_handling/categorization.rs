//! Transport error categorization.

use super::stats::ProcessingStats;
use super::types::{ErrorType, TransportError};

/// Categorizes a `reqwest::Error` into an `ErrorType`.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if error.is_builder() {
        ErrorType::HttpRequestBuilderError
    } else if error.is_redirect() {
        ErrorType::HttpRequestRedirectError
    } else if error.is_timeout() {
        ErrorType::HttpRequestTimeoutError
    } else if error.is_connect() {
        ErrorType::HttpRequestConnectError
    } else if error.is_request() {
        ErrorType::HttpRequestRequestError
    } else if error.is_body() {
        ErrorType::HttpRequestBodyError
    } else if error.is_decode() {
        ErrorType::HttpRequestDecodeError
    } else {
        ErrorType::HttpRequestOtherError
    }
}

/// Categorizes a failed strategy attempt.
pub fn categorize_transport_error(error: &TransportError) -> ErrorType {
    match error {
        TransportError::Request(e) => categorize_reqwest_error(e),
        TransportError::Timeout(_) => ErrorType::HttpRequestTimeoutError,
    }
}

/// Records a failed strategy attempt in the run statistics.
pub fn update_error_stats(stats: &ProcessingStats, error: &TransportError) {
    stats.increment_error(categorize_transport_error(error));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_timeout_is_categorized_as_timeout() {
        let err = TransportError::Timeout(Duration::from_secs(20));
        assert_eq!(
            categorize_transport_error(&err),
            ErrorType::HttpRequestTimeoutError
        );
    }

    #[tokio::test]
    async fn test_connect_error_is_categorized() {
        // Port 9 on localhost is essentially never listening.
        let client = reqwest::Client::new();
        let err = client
            .get("http://127.0.0.1:9/")
            .send()
            .await
            .expect_err("nothing listens on port 9");
        let stats = ProcessingStats::new();
        update_error_stats(&stats, &TransportError::Request(err));
        assert_eq!(stats.total_errors(), 1);
    }
}
