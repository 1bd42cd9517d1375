//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! It handles all HTTP communication for the application.

use std::time::{Duration, Instant};

use postbox_application::ports::{HttpCall, HttpClient, HttpClientError, HttpReply};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Url};
use tracing::debug;

/// HTTP client implementation using reqwest.
///
/// Wraps a single `reqwest::Client` so connections are pooled across calls.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// Default configuration:
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - User-Agent: "Postbox/<version>"
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(concat!("Postbox/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Parses the free-text verb. An empty verb means GET.
    fn to_reqwest_method(verb: &str) -> Result<Method, HttpClientError> {
        let verb = verb.trim().to_ascii_uppercase();
        if verb.is_empty() {
            return Ok(Method::GET);
        }
        Method::from_bytes(verb.as_bytes()).map_err(|_| HttpClientError::InvalidMethod(verb))
    }

    fn to_header_map(call: &HttpCall) -> Result<HeaderMap, HttpClientError> {
        let mut headers = HeaderMap::with_capacity(call.headers.len());
        for (name, value) in &call.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| HttpClientError::InvalidHeader(name.clone()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| HttpClientError::InvalidHeader(name.clone()))?;
            headers.insert(header_name, header_value);
        }
        Ok(headers)
    }

    /// Maps reqwest errors to the port's `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        if error.is_connect() {
            return HttpClientError::ConnectionFailed(error.to_string());
        }

        if error.is_body() || error.is_decode() {
            return HttpClientError::BodyRead(error.to_string());
        }

        HttpClientError::Other(error.to_string())
    }
}

impl HttpClient for ReqwestHttpClient {
    async fn execute(
        &self,
        call: &HttpCall,
        timeout: Duration,
    ) -> Result<HttpReply, HttpClientError> {
        let method = Self::to_reqwest_method(&call.method)?;
        let url = Url::parse(call.url.trim())
            .map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {}", call.url)))?;
        let headers = Self::to_header_map(call)?;
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);

        let mut builder = self
            .client
            .request(method, url)
            .headers(headers)
            .timeout(timeout);
        if let Some(body) = &call.body {
            builder = builder.body(body.clone());
        }

        let start = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| match Self::map_error(&e, timeout_ms) {
                HttpClientError::Other(message) => HttpClientError::BodyRead(message),
                other => other,
            })?;
        let duration = start.elapsed();
        debug!(status = status.as_u16(), bytes = bytes.len(), "response body read");

        Ok(HttpReply {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
            duration,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use postbox_domain::Headers;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serves one canned response and hands back the raw request text.
    async fn serve_once(response: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut chunk = [0_u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                raw.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(split) = text.find("\r\n\r\n") {
                    let length = text[..split]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if raw.len() >= split + 4 + length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            let _ = tx.send(String::from_utf8_lossy(&raw).to_string());
        });
        (format!("http://{addr}"), rx)
    }

    fn call(method: &str, url: &str) -> HttpCall {
        HttpCall {
            method: method.into(),
            url: url.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(ReqwestHttpClient::to_reqwest_method("get").unwrap(), Method::GET);
        assert_eq!(ReqwestHttpClient::to_reqwest_method(" POST ").unwrap(), Method::POST);
        assert_eq!(ReqwestHttpClient::to_reqwest_method("").unwrap(), Method::GET);
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method("PURGE").unwrap().as_str(),
            "PURGE"
        );
        assert!(matches!(
            ReqwestHttpClient::to_reqwest_method("BAD VERB"),
            Err(HttpClientError::InvalidMethod(_))
        ));
    }

    #[test]
    fn test_invalid_header_name() {
        let mut c = call("GET", "https://example.com");
        c.headers.insert("bad header".into(), "x".into());
        assert_eq!(
            ReqwestHttpClient::to_header_map(&c).unwrap_err(),
            HttpClientError::InvalidHeader("bad header".into())
        );
    }

    #[test]
    fn test_client_creation() {
        assert!(ReqwestHttpClient::new().is_ok());
    }

    #[tokio::test]
    async fn test_sends_headers_and_body() {
        let (base, request_rx) = serve_once(
            "HTTP/1.1 201 Created\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello",
        )
        .await;
        let client = ReqwestHttpClient::new().unwrap();
        let mut c = call("post", &format!("{base}/items"));
        c.headers.insert("X-Token".into(), "abc".into());
        c.body = Some("{\"n\":1}".into());

        let reply = client.execute(&c, Duration::from_secs(5)).await.unwrap();

        assert_eq!(reply.status, 201);
        assert_eq!(reply.status_text, "Created");
        assert_eq!(reply.body, "hello");
        let raw = request_rx.await.unwrap();
        assert!(raw.starts_with("POST /items HTTP/1.1\r\n"));
        assert!(raw.to_ascii_lowercase().contains("x-token: abc"));
        assert!(raw.ends_with("{\"n\":1}"));
    }

    #[tokio::test]
    async fn test_error_status_is_a_reply() {
        let (base, _request_rx) = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 7\r\nConnection: close\r\n\r\nmissing",
        )
        .await;
        let client = ReqwestHttpClient::new().unwrap();

        let reply = client.execute(&call("GET", &base), Duration::from_secs(5)).await.unwrap();

        assert_eq!(reply.status, 404);
        assert!(!reply.is_success());
        assert_eq!(reply.body, "missing");
    }

    #[tokio::test]
    async fn test_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });
        let client = ReqwestHttpClient::new().unwrap();

        let err = client
            .execute(&call("GET", &format!("http://{addr}")), Duration::from_millis(100))
            .await
            .unwrap_err();

        assert_eq!(err, HttpClientError::Timeout { timeout_ms: 100 });
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = ReqwestHttpClient::new().unwrap();

        let err = client
            .execute(&call("GET", &format!("http://{addr}")), Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, HttpClientError::ConnectionFailed(_)));
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let client = ReqwestHttpClient::new().unwrap();
        let err = client
            .execute(&call("GET", "::not a url"), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, HttpClientError::InvalidUrl(_)));
    }
}
