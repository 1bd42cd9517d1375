//! User settings persistence.
//!
//! Stores user settings in the platform-specific config directory:
//! - Linux: ~/.config/postbox/settings.json
//! - macOS: ~/Library/Application Support/postbox/settings.json
//! - Windows: %APPDATA%/postbox/settings.json

use std::path::{Path, PathBuf};

use postbox_domain::UserSettings;
use tokio::fs;

use crate::serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};

/// Error type for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// Could not determine config directory.
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Repository for user settings persistence.
#[derive(Debug, Clone, Default)]
pub struct SettingsRepository {
    path: Option<PathBuf>,
}

impl SettingsRepository {
    /// Creates a repository over the platform config directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: Self::settings_path(),
        }
    }

    /// Creates a repository over an explicit settings file.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Returns the path to the Postbox config directory.
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("postbox"))
    }

    /// Returns the path to the settings file.
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Returns the path where settings are stored, if available.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Loads user settings from disk.
    ///
    /// Returns default settings if the file doesn't exist or no config
    /// directory is known.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(&self) -> Result<UserSettings, SettingsError> {
        let Some(path) = &self.path else {
            return Ok(UserSettings::default());
        };

        let content = match fs::read(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(UserSettings::default());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(from_json_bytes(&content)?)
    }

    /// Saves user settings to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if no config directory is known or the file cannot
    /// be written.
    pub async fn save(&self, settings: &UserSettings) -> Result<(), SettingsError> {
        let Some(path) = &self.path else {
            return Err(SettingsError::NoConfigDir);
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = to_json_stable_bytes(settings)?;
        fs::write(path, content).await?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn settings_path_is_valid() {
        if let Some(p) = SettingsRepository::new().path() {
            assert!(p.ends_with("postbox/settings.json"));
        }
    }

    #[tokio::test]
    async fn load_returns_default_when_no_file() {
        let dir = TempDir::new().unwrap();
        let repo = SettingsRepository::at(dir.path().join("settings.json"));
        assert_eq!(repo.load().await.unwrap(), UserSettings::default());
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let repo = SettingsRepository::at(dir.path().join("postbox").join("settings.json"));
        let settings = UserSettings {
            request_timeout_ms: 1500,
            ..UserSettings::default().with_data_dir("/srv/postbox")
        };

        repo.save(&settings).await.unwrap();

        assert_eq!(repo.load().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        let result = SettingsRepository::at(path).load().await;
        assert!(matches!(result, Err(SettingsError::Serialization(_))));
    }
}
