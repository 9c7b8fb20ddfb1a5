use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::errors::StorageError;
use super::types::PersistedFlags;
use crate::config::BOOKMARKER_STATE_FILE;

/// Durable home of the single `authenticated` flag that survives restarts.
#[async_trait]
pub trait AuthFlagStore: Send + Sync + 'static {
    /// Returns `None` when nothing has been stored yet.
    async fn load(&self) -> Result<Option<bool>, StorageError>;

    async fn store(&self, authenticated: bool) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct InMemoryFlagStore {
    flag: Mutex<Option<bool>>,
}

impl InMemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flag(authenticated: bool) -> Self {
        Self {
            flag: Mutex::new(Some(authenticated)),
        }
    }
}

#[async_trait]
impl AuthFlagStore for InMemoryFlagStore {
    async fn load(&self) -> Result<Option<bool>, StorageError> {
        Ok(*self.flag.lock().await)
    }

    async fn store(&self, authenticated: bool) -> Result<(), StorageError> {
        *self.flag.lock().await = Some(authenticated);
        Ok(())
    }
}

/// Keeps the flag in a small JSON file: `{"authenticated": true}`.
#[derive(Debug, Clone)]
pub struct FileFlagStore {
    path: PathBuf,
}

impl FileFlagStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses the path from `BOOKMARKER_STATE_FILE`.
    pub fn from_env() -> Self {
        Self::new(BOOKMARKER_STATE_FILE.as_str())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuthFlagStore for FileFlagStore {
    async fn load(&self) -> Result<Option<bool>, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::Io(format!("{}: {e}", self.path.display()))),
        };

        let flags: PersistedFlags = serde_json::from_str(&raw)
            .map_err(|e| StorageError::Corrupt(format!("{}: {e}", self.path.display())))?;
        Ok(Some(flags.authenticated))
    }

    async fn store(&self, authenticated: bool) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&PersistedFlags { authenticated })
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| StorageError::Io(format!("{}: {e}", self.path.display())))
    }
}
