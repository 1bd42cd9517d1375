//! File-backed workspace store.
//!
//! Collections and the environment are kept in two JSON documents, each
//! rewritten whole on every save:
//!
//! ```text
//! <data_dir>/
//!   collection.json     # [{"name": ..., "requests": [...]}, ...]
//!   environment.json    # [{"key": ..., "value": ...}, ...]
//! ```

use std::path::{Path, PathBuf};

use postbox_application::ports::{Document, FileSystem, FileSystemError, StoreError, WorkspaceStore};
use postbox_domain::{Collection, Environment, UserSettings};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Workspace store over two JSON files.
#[derive(Debug, Clone)]
pub struct JsonWorkspaceStore<F: FileSystem> {
    fs: F,
    collections_path: PathBuf,
    environment_path: PathBuf,
}

impl<F: FileSystem> JsonWorkspaceStore<F> {
    /// Creates a store over explicit document paths.
    pub fn new(
        fs: F,
        collections_path: impl Into<PathBuf>,
        environment_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fs,
            collections_path: collections_path.into(),
            environment_path: environment_path.into(),
        }
    }

    /// Creates a store over the paths named by the user settings.
    pub fn from_settings(fs: F, settings: &UserSettings) -> Self {
        Self::new(fs, settings.collections_path(), settings.environment_path())
    }

    /// Path of the collections document.
    #[must_use]
    pub fn collections_path(&self) -> &Path {
        &self.collections_path
    }

    /// Path of the environment document.
    #[must_use]
    pub fn environment_path(&self) -> &Path {
        &self.environment_path
    }

    fn path(&self, document: Document) -> &Path {
        match document {
            Document::Collections => &self.collections_path,
            Document::Environment => &self.environment_path,
        }
    }

    async fn load<T>(&self, document: Document) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path(document);
        let bytes = match self.fs.read_file(path).await {
            Ok(bytes) => bytes,
            Err(FileSystemError::NotFound(_)) => {
                debug!(%document, path = %path.display(), "document missing, starting empty");
                return Ok(T::default());
            }
            Err(source) => return Err(StoreError::Io { document, source }),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }

        let value: Option<T> = from_json_bytes(&bytes).map_err(|e| StoreError::Serialization {
            document,
            message: e.to_string(),
        })?;
        Ok(value.unwrap_or_default())
    }

    async fn save<T: Serialize + Sync>(
        &self,
        document: Document,
        value: &T,
    ) -> Result<(), StoreError> {
        let bytes = to_json_stable_bytes(value).map_err(|e| StoreError::Serialization {
            document,
            message: e.to_string(),
        })?;
        let path = self.path(document);
        self.fs
            .write_file(path, &bytes)
            .await
            .map_err(|source| StoreError::Io { document, source })?;
        debug!(%document, path = %path.display(), bytes = bytes.len(), "document saved");
        Ok(())
    }
}

impl<F: FileSystem> WorkspaceStore for JsonWorkspaceStore<F> {
    async fn load_collections(&self) -> Result<Vec<Collection>, StoreError> {
        self.load(Document::Collections).await
    }

    async fn save_collections(&self, collections: &[Collection]) -> Result<(), StoreError> {
        self.save(Document::Collections, &collections).await
    }

    async fn load_environment(&self) -> Result<Environment, StoreError> {
        self.load(Document::Environment).await
    }

    async fn save_environment(&self, environment: &Environment) -> Result<(), StoreError> {
        self.save(Document::Environment, environment).await
    }
}
