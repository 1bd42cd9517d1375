//! Saved request type

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Request headers, keyed by header name.
///
/// A `BTreeMap` keeps the compact JSON rendering in the edit buffer stable.
pub type Headers = BTreeMap<String, String>;

/// A request saved inside a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Display name, unique within the owning collection.
    #[serde(alias = "Name")]
    pub name: String,
    /// HTTP verb, kept as written.
    #[serde(alias = "Verb", default)]
    pub verb: String,
    /// Target URL, validated only when the request is fired.
    #[serde(alias = "Url", default)]
    pub url: String,
    /// Request headers.
    #[serde(alias = "Headers", default, deserialize_with = "null_as_default")]
    pub headers: Headers,
    /// Request body as an arbitrary JSON value.
    #[serde(alias = "Body", default)]
    pub body: Value,
}

impl Request {
    /// Creates a request with the given name and no verb, URL, headers or body.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            verb: String::new(),
            url: String::new(),
            headers: Headers::new(),
            body: Value::Null,
        }
    }

    /// Creates a GET request with the given URL.
    #[must_use]
    pub fn get(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            verb: "GET".to_string(),
            url: url.into(),
            ..Self::new(name)
        }
    }

    /// Adds a header, replacing any previous value for the same name.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the body value.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }
}

/// Older documents write a missing header map as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_new_request() {
        let req = Request::new("Ping");
        assert_eq!(req.name, "Ping");
        assert!(req.headers.is_empty());
        assert_eq!(req.body, Value::Null);
        assert!(req.verb.is_empty());
    }

    #[test]
    fn test_get_request() {
        let req = Request::get("Users", "https://api.example.com/users");
        assert_eq!(req.verb, "GET");
        assert_eq!(req.url, "https://api.example.com/users");
    }

    #[test]
    fn test_deserialize_null_headers_and_missing_body() {
        let req: Request = serde_json::from_value(json!({
            "name": "Ping",
            "verb": "GET",
            "url": "https://example.com",
            "headers": null
        }))
        .unwrap();
        assert!(req.headers.is_empty());
        assert_eq!(req.body, Value::Null);
    }

    #[test]
    fn test_deserialize_capitalized_fields() {
        let req: Request = serde_json::from_value(json!({
            "Id": 0,
            "Name": "Create",
            "Verb": "POST",
            "Url": "https://example.com/items",
            "Headers": {"Accept": "application/json"},
            "Body": {"a": [1, 2]}
        }))
        .unwrap();
        assert_eq!(req.name, "Create");
        assert_eq!(req.headers["Accept"], "application/json");
        assert_eq!(req.body, json!({"a": [1, 2]}));
    }
}
