//! Text protocol for the single edit buffer.
//!
//! Every entity the user opens is presented as plain text in one editor and
//! parsed back when the user commits. The number of newline-separated
//! segments tells the two shapes apart:
//!
//! ```text
//! Demo                                  <- 1 segment: a collection name
//!
//! Ping                                  <- 5 segments: a full request
//! GET
//! https://example.com
//! {"Accept":"application/json"}
//! null
//! ```
//!
//! The buffer is split at most four times, so the body segment keeps any
//! newlines it contains. Any other segment count is rejected. Names are
//! trimmed, so `Demo ` and `Demo` are the same name.

use serde_json::Value;

use crate::collection::Collection;
use crate::request::{Headers, Request};

/// Number of segments in an encoded request.
pub const REQUEST_SEGMENTS: usize = 5;

/// The result of decoding an edit buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A single segment: the name for a collection create or rename.
    Name(String),
    /// Five segments: a full request.
    Request(RequestPayload),
    /// Any other shape. Carries the segment count for diagnostics.
    Rejected {
        /// How many segments the buffer split into.
        segments: usize,
    },
}

impl Decoded {
    /// Returns the number of segments the buffer held.
    #[must_use]
    pub const fn segments(&self) -> usize {
        match self {
            Self::Name(_) => 1,
            Self::Request(_) => REQUEST_SEGMENTS,
            Self::Rejected { segments } => *segments,
        }
    }
}

/// A request decoded from five segments.
///
/// `headers` and `body` are `None` when their segment is not valid JSON of
/// the expected shape. The raw segment text is kept for callers that send
/// the buffer as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPayload {
    /// Segment 0.
    pub name: String,
    /// Segment 1.
    pub verb: String,
    /// Segment 2.
    pub url: String,
    /// Segment 3, parsed as a JSON object of strings.
    pub headers: Option<Headers>,
    /// Segment 4, parsed as any JSON value.
    pub body: Option<Value>,
    /// Segment 3 as written.
    pub raw_headers: String,
    /// Segment 4 as written.
    pub raw_body: String,
}

impl RequestPayload {
    /// Builds a new request. Unparseable headers or body fall back to empty
    /// headers and a `null` body.
    #[must_use]
    pub fn into_request(self) -> Request {
        Request {
            name: self.name,
            verb: self.verb,
            url: self.url,
            headers: self.headers.unwrap_or_default(),
            body: self.body.unwrap_or(Value::Null),
        }
    }

    /// Overwrites `request` in place. Unparseable headers or body leave the
    /// previous value untouched.
    pub fn apply_to(self, request: &mut Request) {
        request.name = self.name;
        request.verb = self.verb;
        request.url = self.url;
        if let Some(headers) = self.headers {
            request.headers = headers;
        }
        if let Some(body) = self.body {
            request.body = body;
        }
    }
}

/// Encodes a request as five lines: name, verb, url, headers, body.
#[must_use]
pub fn encode_request(request: &Request) -> String {
    let headers =
        serde_json::to_string(&request.headers).unwrap_or_else(|_| String::from("{}"));
    [
        request.name.as_str(),
        request.verb.as_str(),
        request.url.as_str(),
        headers.as_str(),
        &request.body.to_string(),
    ]
    .join("\n")
}

/// Encodes a collection as its bare name.
#[must_use]
pub fn encode_collection(collection: &Collection) -> String {
    collection.name.clone()
}

/// Decodes an edit buffer by segment count.
#[must_use]
pub fn decode(text: &str) -> Decoded {
    let segments: Vec<&str> = text.splitn(REQUEST_SEGMENTS, '\n').collect();
    match segments.as_slice() {
        [name] => Decoded::Name(name.trim().to_string()),
        [name, verb, url, headers, body] => {
            let raw_headers = strip_cr(headers).to_string();
            let raw_body = (*body).to_string();
            Decoded::Request(RequestPayload {
                name: name.trim().to_string(),
                verb: verb.trim().to_string(),
                url: url.trim().to_string(),
                headers: serde_json::from_str(&raw_headers).ok(),
                body: serde_json::from_str(&raw_body).ok(),
                raw_headers,
                raw_body,
            })
        }
        other => Decoded::Rejected {
            segments: other.len(),
        },
    }
}

fn strip_cr(segment: &str) -> &str {
    segment.strip_suffix('\r').unwrap_or(segment)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn payload(text: &str) -> RequestPayload {
        match decode(text) {
            Decoded::Request(payload) => payload,
            other => panic!("expected a request payload, got {other:?}"),
        }
    }

    #[test]
    fn test_single_segment_is_a_name() {
        assert_eq!(decode("Demo"), Decoded::Name("Demo".into()));
        assert_eq!(decode(""), Decoded::Name(String::new()));
    }

    #[test]
    fn test_names_are_trimmed() {
        assert_eq!(decode("  Demo \r"), Decoded::Name("Demo".into()));
        assert_eq!(payload("Ping \nGET\nhttps://example.com\n{}\nnull").name, "Ping");
    }

    #[test]
    fn test_five_segments_is_a_request() {
        let p = payload("Ping\nGET\nhttps://example.com\n{}\nnull");
        assert_eq!(p.name, "Ping");
        assert_eq!(p.verb, "GET");
        assert_eq!(p.url, "https://example.com");
        assert_eq!(p.headers, Some(Headers::new()));
        assert_eq!(p.body, Some(Value::Null));
    }

    #[test]
    fn test_other_counts_are_rejected() {
        assert_eq!(decode("Demo\n"), Decoded::Rejected { segments: 2 });
        assert_eq!(decode("a\nb\nc"), Decoded::Rejected { segments: 3 });
        assert_eq!(decode("a\nb\nc\nd"), Decoded::Rejected { segments: 4 });
    }

    #[test]
    fn test_body_keeps_embedded_newlines() {
        let p = payload("Create\nPOST\nhttps://example.com\n{}\n{\n  \"a\": [1,\n 2]\n}");
        assert_eq!(p.raw_body, "{\n  \"a\": [1,\n 2]\n}");
        assert_eq!(p.body, Some(json!({"a": [1, 2]})));
    }

    #[test]
    fn test_malformed_json_segments_decode_to_none() {
        let p = payload("Ping\nGET\nhttps://example.com\n{not json\nnot json either");
        assert_eq!(p.headers, None);
        assert_eq!(p.body, None);
        assert_eq!(p.raw_headers, "{not json");

        let request = p.into_request();
        assert!(request.headers.is_empty());
        assert_eq!(request.body, Value::Null);
    }

    #[test]
    fn test_non_string_header_values_are_malformed() {
        let p = payload("Ping\nGET\nhttps://example.com\n{\"X\":1}\nnull");
        assert_eq!(p.headers, None);
    }

    #[test]
    fn test_apply_keeps_previous_fields_on_parse_failure() {
        let mut request = Request::get("Ping", "https://example.com")
            .with_header("X", "1")
            .with_body(json!({"keep": true}));
        payload("Pong\nPOST\nhttps://example.org\n[broken\n{broken").apply_to(&mut request);

        assert_eq!(request.name, "Pong");
        assert_eq!(request.verb, "POST");
        assert_eq!(request.url, "https://example.org");
        assert_eq!(request.headers["X"], "1");
        assert_eq!(request.body, json!({"keep": true}));
    }

    #[test]
    fn test_request_round_trip() {
        let request = Request::get("Users", "https://api.example.com/users?page=2")
            .with_header("Accept", "application/json")
            .with_header("X-Trace", "a b\tc")
            .with_body(json!({"nested": {"list": [1, "two", null, {"deep": "line\nbreak"}]}}));

        let decoded = payload(&encode_request(&request)).into_request();
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_encoding_has_five_lines() {
        let text = encode_request(&Request::get("Ping", "https://example.com"));
        assert_eq!(text, "Ping\nGET\nhttps://example.com\n{}\nnull");
    }

    #[test]
    fn test_collection_encoding_is_the_name() {
        let collection = Collection::new("Demo");
        assert_eq!(
            decode(&encode_collection(&collection)),
            Decoded::Name("Demo".into())
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let p = payload("Ping\r\nGET\r\nhttps://example.com\r\n{}\r\nnull");
        assert_eq!(p.name, "Ping");
        assert_eq!(p.url, "https://example.com");
        assert_eq!(p.headers, Some(Headers::new()));
        assert_eq!(p.body, Some(Value::Null));
    }
}
