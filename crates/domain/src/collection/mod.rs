//! Collections of saved requests

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::request::Request;

/// A named, ordered group of requests.
///
/// Insertion order is display order. Requests are only ever appended or
/// removed by name, so positions of the remaining entries never shift
/// relative to one another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Display name, unique among collections.
    #[serde(alias = "Name")]
    pub name: String,
    /// Requests owned by this collection.
    #[serde(alias = "Requests", default, deserialize_with = "null_as_empty")]
    pub requests: Vec<Request>,
}

impl Collection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requests: Vec::new(),
        }
    }

    /// Adds a request to the collection (builder style).
    #[must_use]
    pub fn with_request(mut self, request: Request) -> Self {
        self.requests.push(request);
        self
    }

    /// Returns the request names in display order.
    #[must_use]
    pub fn request_names(&self) -> Vec<String> {
        self.requests.iter().map(|r| r.name.clone()).collect()
    }

    /// Finds the first request with the given name.
    #[must_use]
    pub fn request(&self, name: &str) -> Option<&Request> {
        self.requests.iter().find(|r| r.name == name)
    }

    /// Finds the first request with the given name, mutably.
    pub fn request_mut(&mut self, name: &str) -> Option<&mut Request> {
        self.requests.iter_mut().find(|r| r.name == name)
    }

    /// Returns true if a request with this name exists.
    #[must_use]
    pub fn contains_request(&self, name: &str) -> bool {
        self.request(name).is_some()
    }

    /// Appends a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or already used in this collection.
    pub fn add_request(&mut self, request: Request) -> DomainResult<()> {
        if request.name.trim().is_empty() {
            return Err(DomainError::EmptyName);
        }
        if self.contains_request(&request.name) {
            return Err(DomainError::DuplicateRequest {
                collection: self.name.clone(),
                request: request.name,
            });
        }
        self.requests.push(request);
        Ok(())
    }

    /// Removes the first request with the given name and returns it.
    pub fn remove_request(&mut self, name: &str) -> Option<Request> {
        let index = self.requests.iter().position(|r| r.name == name)?;
        Some(self.requests.remove(index))
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Request>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Request>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn demo() -> Collection {
        Collection::new("Demo")
            .with_request(Request::get("Ping", "https://example.com/ping"))
            .with_request(Request::get("Users", "https://example.com/users"))
    }

    #[test]
    fn test_request_names_keep_insertion_order() {
        assert_eq!(demo().request_names(), vec!["Ping", "Users"]);
    }

    #[test]
    fn test_add_request_rejects_duplicate() {
        let mut collection = demo();
        let err = collection
            .add_request(Request::get("Ping", "https://other.example.com"))
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::DuplicateRequest {
                collection: "Demo".into(),
                request: "Ping".into(),
            }
        );
        assert_eq!(collection.requests.len(), 2);
    }

    #[test]
    fn test_add_request_rejects_blank_name() {
        let mut collection = Collection::new("Demo");
        assert_eq!(
            collection.add_request(Request::new("  ")),
            Err(DomainError::EmptyName)
        );
    }

    #[test]
    fn test_remove_request() {
        let mut collection = demo();
        let removed = collection.remove_request("Ping").unwrap();
        assert_eq!(removed.name, "Ping");
        assert_eq!(collection.request_names(), vec!["Users"]);
        assert!(collection.remove_request("Ping").is_none());
    }

    #[test]
    fn test_deserialize_null_requests() {
        let collection: Collection =
            serde_json::from_str(r#"{"Id":0,"Name":"Legacy","Requests":null}"#).unwrap();
        assert_eq!(collection, Collection::new("Legacy"));
    }
}
