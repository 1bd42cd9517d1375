//! Fire Request Use Case
//!
//! Turns the current edit buffer into an HTTP call and runs it against the
//! `HttpClient` port. The buffer is read as written, not as stored, so the
//! user can fire edits they have not committed yet.

use std::sync::Arc;
use std::time::Duration;

use postbox_domain::edit_buffer::{Decoded, decode};
use postbox_domain::{Environment, Headers};
use thiserror::Error;
use tracing::{debug, info};

use crate::ports::{CancellationReceiver, HttpCall, HttpClient, HttpClientError, HttpReply};
use crate::variable_resolver::resolve;

/// Result type for request execution.
pub type ExecuteResult = Result<HttpReply, ExecuteRequestError>;

/// Error type for the fire-request use case.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecuteRequestError {
    /// The buffer is not a five-line request.
    #[error("Invalid request format: expected 5 lines, found {segments}")]
    InvalidFormat {
        /// Segment count of the buffer.
        segments: usize,
    },

    /// The headers line is not a JSON object of strings.
    #[error("Failed to parse headers JSON: {0}")]
    InvalidHeaders(String),

    /// URL is empty.
    #[error("URL is required")]
    EmptyUrl,

    /// URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP request failed.
    #[error("{0}")]
    Http(#[from] HttpClientError),
}

/// Builds the call described by an edit buffer.
///
/// `{{KEY}}` references in the URL, header values and body are replaced from
/// `environment`. A body that is empty or the literal `null` is not sent.
///
/// # Errors
///
/// Returns an error if the buffer is not five lines or the headers line is
/// not a JSON object of strings.
pub fn prepare_call(
    buffer: &str,
    environment: &Environment,
) -> Result<HttpCall, ExecuteRequestError> {
    let payload = match decode(buffer) {
        Decoded::Request(payload) => payload,
        other => {
            return Err(ExecuteRequestError::InvalidFormat {
                segments: other.segments(),
            });
        }
    };

    let headers: Headers = serde_json::from_str(&payload.raw_headers)
        .map_err(|e| ExecuteRequestError::InvalidHeaders(e.to_string()))?;
    let headers = headers
        .into_iter()
        .map(|(name, value)| (name, resolve(&value, environment)))
        .collect();

    let raw_body = payload.raw_body.trim();
    let body = if raw_body.is_empty() || raw_body == "null" {
        None
    } else {
        Some(resolve(&payload.raw_body, environment))
    };

    Ok(HttpCall {
        method: payload.verb,
        url: resolve(&payload.url, environment),
        headers,
        body,
    })
}

/// Use case for firing HTTP requests.
///
/// # Example
///
/// ```ignore
/// let fire = FireRequest::new(Arc::new(ReqwestHttpClient::new()?), Duration::from_secs(30));
/// let call = prepare_call(&buffer, workspace.environment())?;
/// let (token, receiver) = CancellationToken::new();
/// let reply = fire.execute_with_cancellation(&call, receiver).await?;
/// ```
#[derive(Debug)]
pub struct FireRequest<C: HttpClient> {
    client: Arc<C>,
    timeout: Duration,
}

impl<C: HttpClient> Clone for FireRequest<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            timeout: self.timeout,
        }
    }
}

impl<C: HttpClient> FireRequest<C> {
    /// Creates the use case with a client and a per-call time budget.
    pub const fn new(client: Arc<C>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// The per-call time budget.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Executes the call unless `cancel` fires first.
    ///
    /// # Errors
    ///
    /// Returns `HttpClientError::Cancelled` if cancelled, or
    /// `ExecuteRequestError` on validation or HTTP failures.
    pub async fn execute_with_cancellation(
        &self,
        call: &HttpCall,
        mut cancel: CancellationReceiver,
    ) -> ExecuteResult {
        Self::validate(call)?;
        if cancel.is_cancelled() {
            return Err(HttpClientError::Cancelled.into());
        }
        info!(method = %call.method, url = %call.url, "firing request");

        tokio::select! {
            result = self.client.execute(call, self.timeout) => {
                let reply = result?;
                debug!(
                    status = reply.status,
                    elapsed_ms = reply.duration.as_millis(),
                    "reply received"
                );
                Ok(reply)
            }
            () = cancel.cancelled() => {
                debug!(url = %call.url, "request superseded");
                Err(ExecuteRequestError::Http(HttpClientError::Cancelled))
            }
        }
    }

    fn validate(call: &HttpCall) -> Result<(), ExecuteRequestError> {
        let url = call.url.trim();
        if url.is_empty() {
            return Err(ExecuteRequestError::EmptyUrl);
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ExecuteRequestError::InvalidUrl(
                "URL must start with http:// or https://".to_string(),
            ));
        }

        url::Url::parse(url).map_err(|e| ExecuteRequestError::InvalidUrl(e.to_string()))?;
        Ok(())
    }
}
