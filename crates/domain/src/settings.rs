//! User Settings Domain Model
//!
//! Defines where Postbox keeps its documents and how it talks to servers.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// User settings for the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Directory holding the collections and environment documents.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// File name of the collections document inside `data_dir`.
    #[serde(default = "default_collections_file")]
    pub collections_file: String,

    /// File name of the environment document inside `data_dir`.
    #[serde(default = "default_environment_file")]
    pub environment_file: String,

    /// Upper bound for a single fired request, in milliseconds. `0` means
    /// the default.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("db")
}

fn default_collections_file() -> String {
    "collection.json".to_string()
}

fn default_environment_file() -> String {
    "environment.json".to_string()
}

const fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl UserSettings {
    /// Path of the collections document.
    #[must_use]
    pub fn collections_path(&self) -> PathBuf {
        self.data_dir.join(&self.collections_file)
    }

    /// Path of the environment document.
    #[must_use]
    pub fn environment_path(&self) -> PathBuf {
        self.data_dir.join(&self.environment_file)
    }

    /// Request timeout as a `Duration`. A zero budget would fail every call,
    /// so it falls back to the default.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        let ms = if self.request_timeout_ms == 0 {
            default_request_timeout_ms()
        } else {
            self.request_timeout_ms
        };
        Duration::from_millis(ms)
    }

    /// Returns a copy with a different data directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            collections_file: default_collections_file(),
            environment_file: default_environment_file(),
            request_timeout_ms: default_request_timeout_ms(),
            log_filter: default_log_filter(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_settings() {
        let settings = UserSettings::default();
        assert_eq!(settings.collections_path(), PathBuf::from("db/collection.json"));
        assert_eq!(settings.environment_path(), PathBuf::from("db/environment.json"));
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn partial_document_fills_defaults() {
        let settings: UserSettings =
            serde_json::from_str(r#"{"data_dir": "/tmp/pb", "request_timeout_ms": 500}"#).unwrap();
        assert_eq!(settings.collections_path(), PathBuf::from("/tmp/pb/collection.json"));
        assert_eq!(settings.request_timeout_ms, 500);
        assert_eq!(settings.environment_file, "environment.json");
    }

    #[test]
    fn zero_timeout_uses_default() {
        let settings: UserSettings = serde_json::from_str(r#"{"request_timeout_ms": 0}"#).unwrap();
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));

        let settings = UserSettings {
            request_timeout_ms: 1,
            ..UserSettings::default()
        };
        assert_eq!(settings.request_timeout(), Duration::from_millis(1));
    }

    #[test]
    fn with_data_dir_overrides() {
        let settings = UserSettings::default().with_data_dir("/var/lib/postbox");
        assert_eq!(
            settings.environment_path(),
            PathBuf::from("/var/lib/postbox/environment.json")
        );
    }
}
