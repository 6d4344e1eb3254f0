//! Filesystem adapters for Personae.
//!
//! Implements the `ObjectStore` trait from `personae-core` on top of a local
//! directory, and resolves the data directory.

use std::path::{Component, Path, PathBuf};

use personae_core::storage::object_store::ObjectStore;
use personae_types::error::FileError;

/// Directory under the data dir holding uploaded agent files.
pub const AGENT_FILES_DIR: &str = "agent-files";

/// Object store rooted at a local directory.
///
/// Keys are relative paths; keys that would escape the root are refused.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at `{data_dir}/agent-files`.
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(AGENT_FILES_DIR))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, FileError> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(FileError::InvalidFilename(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

fn io_error(e: std::io::Error) -> FileError {
    FileError::ObjectStore(e.to_string())
}

impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, data: &[u8]) -> Result<(), FileError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        tokio::fs::write(&path, data).await.map_err(io_error)
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, FileError> {
        let path = self.resolve(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(FileError::NotFound),
            Err(e) => Err(io_error(e)),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), FileError> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(e)),
        }
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<(), FileError> {
        let path = self.resolve(prefix)?;
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(e)),
        }
    }
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `PERSONAE_DATA_DIR` environment variable
/// 2. `~/.personae`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PERSONAE_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".personae");
    }

    // Last resort: current directory
    PathBuf::from(".personae")
}
