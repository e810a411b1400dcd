//! Response normalization.
//!
//! Every strategy reduces its `reqwest::Response` to a [`RawResponse`] so the
//! fetcher and the redirect detector never deal with transport specifics.

use reqwest::header::HeaderMap;

use crate::config::MAX_RESPONSE_BODY_SIZE;

/// A transport-independent view of one HTTP response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code of the final response.
    pub status: u16,
    /// URL of the final response, after the transport's own 3xx handling.
    pub final_url: String,
    /// Headers of the final response.
    pub headers: HeaderMap,
    /// Body decoded lossily as UTF-8, truncated to `MAX_RESPONSE_BODY_SIZE` bytes.
    pub body: String,
}

/// Reads a response into a [`RawResponse`], streaming the body with a size cap.
///
/// A body larger than the cap is truncated rather than rejected: only the head
/// of the page is ever inspected. A stream error after some bytes were read
/// also truncates; an error before any byte arrives is returned.
pub(crate) async fn read_response(
    mut response: reqwest::Response,
) -> Result<RawResponse, reqwest::Error> {
    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let headers = response.headers().clone();

    let mut buf: Vec<u8> = Vec::with_capacity(16 * 1024);
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let room = MAX_RESPONSE_BODY_SIZE - buf.len();
                if chunk.len() > room {
                    buf.extend_from_slice(&chunk[..room]);
                    log::debug!(
                        "Body of {} exceeds {}KB, truncating",
                        final_url,
                        MAX_RESPONSE_BODY_SIZE / 1024
                    );
                    break;
                }
                buf.extend_from_slice(&chunk);
                if buf.len() == MAX_RESPONSE_BODY_SIZE {
                    log::debug!(
                        "Read cap of {}KB reached for {}",
                        MAX_RESPONSE_BODY_SIZE / 1024,
                        final_url
                    );
                    break;
                }
            }
            Ok(None) => break,
            Err(e) if buf.is_empty() => return Err(e),
            Err(e) => {
                log::debug!("Body stream error for {} after {} bytes: {}", final_url, buf.len(), e);
                break;
            }
        }
    }

    Ok(RawResponse {
        status,
        final_url,
        headers,
        body: String::from_utf8_lossy(&buf).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve_body(body: Vec<u8>) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .mount(&server)
            .await;
        server
    }

    /// Answers one connection with `Content-Length: 100` and only `sent` body bytes.
    async fn short_body_server(sent: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0u8; 1024];
                let _ = tokio::io::AsyncReadExt::read(&mut socket, &mut request).await;
                let head = "HTTP/1.1 200 OK\r\nContent-Length: 100\r\nContent-Type: text/html\r\n\r\n";
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(sent).await;
                let _ = socket.flush().await;
            }
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn test_oversized_body_is_truncated_to_cap() {
        let server = serve_body(vec![b'a'; MAX_RESPONSE_BODY_SIZE + 1000]).await;
        let response = reqwest::get(server.uri()).await.expect("request");

        let raw = read_response(response).await.expect("body should be read");
        assert_eq!(raw.status, 200);
        assert_eq!(raw.body.len(), MAX_RESPONSE_BODY_SIZE);
    }

    #[tokio::test]
    async fn test_body_of_exactly_cap_size_is_kept_whole() {
        let server = serve_body(vec![b'b'; MAX_RESPONSE_BODY_SIZE]).await;
        let response = reqwest::get(server.uri()).await.expect("request");

        let raw = read_response(response).await.expect("body should be read");
        assert_eq!(raw.body.len(), MAX_RESPONSE_BODY_SIZE);
    }

    #[tokio::test]
    async fn test_stream_error_after_some_bytes_keeps_partial_body() {
        let url = short_body_server(b"<html>partial").await;
        let response = reqwest::get(&url).await.expect("headers arrive");

        let raw = read_response(response).await.expect("partial body is kept");
        assert_eq!(raw.body, "<html>partial");
    }

    #[tokio::test]
    async fn test_stream_error_before_any_byte_is_returned() {
        let url = short_body_server(b"").await;
        let response = reqwest::get(&url).await.expect("headers arrive");

        assert!(read_response(response).await.is_err());
    }
}
