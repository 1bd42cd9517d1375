//! HTTP Client port

use std::future::Future;
use std::time::Duration;

use postbox_domain::Headers;
use thiserror::Error;
use tokio::sync::watch;

/// A fully resolved call, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpCall {
    /// Verb as written by the user.
    pub method: String,
    /// Absolute URL.
    pub url: String,
    /// Headers to send.
    pub headers: Headers,
    /// Raw body text, if any.
    pub body: Option<String>,
}

/// What came back from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code.
    pub status: u16,
    /// Canonical reason phrase, empty if unknown.
    pub status_text: String,
    /// Response body, decoded lossily as UTF-8.
    pub body: String,
    /// Time from send to last body byte.
    pub duration: Duration,
}

impl HttpReply {
    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Errors from the HTTP transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// The verb is not a valid HTTP method token.
    #[error("Failed to create request: invalid method '{0}'")]
    InvalidMethod(String),

    /// The URL could not be parsed.
    #[error("Failed to create request: invalid URL {0}")]
    InvalidUrl(String),

    /// A header name or value is not valid.
    #[error("Failed to create request: invalid header '{0}'")]
    InvalidHeader(String),

    /// The call exceeded its time budget.
    #[error("Request timed out after {timeout_ms} ms")]
    Timeout {
        /// The budget that was exceeded.
        timeout_ms: u64,
    },

    /// The connection could not be established.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The body could not be read to the end.
    #[error("Failed to read response body: {0}")]
    BodyRead(String),

    /// A newer call replaced this one.
    #[error("Request cancelled")]
    Cancelled,

    /// Any other transport failure.
    #[error("An error occurred: {0}")]
    Other(String),
}

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, allowing
/// the application layer to be independent of specific HTTP libraries.
pub trait HttpClient: Send + Sync {
    /// Performs one call.
    ///
    /// # Errors
    ///
    /// Returns an error if the call cannot be built, sent, or read back
    /// within `timeout`.
    fn execute(
        &self,
        call: &HttpCall,
        timeout: Duration,
    ) -> impl Future<Output = Result<HttpReply, HttpClientError>> + Send;
}

/// Cancels an in-flight call when the user fires a newer one.
#[derive(Debug)]
pub struct CancellationToken {
    sender: watch::Sender<bool>,
}

/// The receiving half handed to the running call.
#[derive(Debug, Clone)]
pub struct CancellationReceiver {
    receiver: watch::Receiver<bool>,
}

impl CancellationToken {
    /// Creates a linked token/receiver pair.
    #[must_use]
    pub fn new() -> (Self, CancellationReceiver) {
        let (sender, receiver) = watch::channel(false);
        (Self { sender }, CancellationReceiver { receiver })
    }

    /// Signals cancellation. Calling it twice is harmless.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

impl CancellationReceiver {
    /// Returns true if cancellation was already requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once cancellation is requested.
    ///
    /// Dropping the token without cancelling never resolves this future.
    pub async fn cancelled(&mut self) {
        if self.receiver.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
