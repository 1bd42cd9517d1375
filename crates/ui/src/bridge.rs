//! UI Bridge Module
//!
//! Defines what flows into the event loop besides key presses: results of
//! background fire-request tasks, and the text the response viewer shows.

use std::time::Duration;

use crossterm::event::KeyEvent;
use postbox_application::{ExecuteRequestError, ExecuteResult, HttpClientError};

/// Terminal input forwarded from the blocking reader thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized and needs a redraw.
    Resize,
}

/// Updates sent from background tasks to the event loop.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    /// A fired request finished.
    Response {
        /// Generation number the call was started with.
        generation: u64,
        /// What came back.
        result: ExecuteResult,
    },
}

/// How the viewer title is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    /// Nothing to report yet.
    #[default]
    Neutral,
    /// A 2xx reply.
    Success,
    /// A non-2xx reply or a failed call.
    Failure,
}

/// Title and body of the response viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerContent {
    /// Panel title.
    pub title: String,
    /// Text shown verbatim.
    pub body: String,
    /// Title color.
    pub tone: Tone,
}

impl Default for ViewerContent {
    fn default() -> Self {
        Self {
            title: "Response".to_string(),
            body: String::new(),
            tone: Tone::Neutral,
        }
    }
}

impl ViewerContent {
    /// Shown while a call is in flight.
    #[must_use]
    pub fn pending(method: &str, url: &str, timeout: Duration) -> Self {
        Self {
            title: format!("Response: sending... (timeout {} ms)", timeout.as_millis()),
            body: format!("{} {url}", method.trim().to_ascii_uppercase()),
            tone: Tone::Neutral,
        }
    }

    /// Shown when the buffer could not be turned into a call.
    #[must_use]
    pub fn error(error: &ExecuteRequestError) -> Self {
        Self {
            title: "Response: error".to_string(),
            body: error.to_string(),
            tone: Tone::Failure,
        }
    }

    /// Renders a finished call. Returns `None` for a superseded one.
    #[must_use]
    pub fn from_result(result: &ExecuteResult) -> Option<Self> {
        match result {
            Ok(reply) => {
                let status = if reply.status_text.is_empty() {
                    reply.status.to_string()
                } else {
                    format!("{} {}", reply.status, reply.status_text)
                };
                Some(Self {
                    title: format!("Response: {status} ({} ms)", reply.duration.as_millis()),
                    body: reply.body.clone(),
                    tone: if reply.is_success() {
                        Tone::Success
                    } else {
                        Tone::Failure
                    },
                })
            }
            Err(ExecuteRequestError::Http(HttpClientError::Cancelled)) => None,
            Err(e) => Some(Self::error(e)),
        }
    }
}
