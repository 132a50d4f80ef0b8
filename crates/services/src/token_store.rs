//! Bearer token persistence.
//!
//! The token lives under the fixed key [`OAUTH_TOKEN_KEY`]. The feed
//! services only read it; the OAuth and logout flows write it.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// Key the bearer token is stored under.
pub const OAUTH_TOKEN_KEY: &str = "OAuthToken";

#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed token file: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Get/set access to the current bearer token.
pub trait TokenStore: Send + Sync {
    /// The stored token, if any.
    fn token(&self) -> Option<String>;

    fn set_token(&self, token: &str) -> Result<(), TokenStoreError>;

    fn clear_token(&self) -> Result<(), TokenStoreError>;
}

// ---------------------------------------------------------------------------
// MemoryTokenStore
// ---------------------------------------------------------------------------

/// Process-local store; the token is gone when the process exits.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_token(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<(), TokenStoreError> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileTokenStore
// ---------------------------------------------------------------------------

/// JSON key-value file readable only by the owning user.
///
/// Writes go to a sibling temporary file that is renamed into place, so a
/// crash never leaves a half-written token file behind. On Unix the file
/// is created with mode `0600`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, TokenStoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), TokenStoreError> {
        if entries.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }

        let tmp_path = self.path.with_extension("tmp");
        let mut file = open_private(&tmp_path)?;
        file.write_all(&serde_json::to_vec_pretty(entries)?)?;
        file.sync_all()?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        match self.read_entries() {
            Ok(mut entries) => entries.remove(OAUTH_TOKEN_KEY),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read token file");
                None
            }
        }
    }

    fn set_token(&self, token: &str) -> Result<(), TokenStoreError> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(OAUTH_TOKEN_KEY.to_string(), token.to_string());
        self.write_entries(&entries)?;
        tracing::info!(path = %self.path.display(), "OAuth token stored");
        Ok(())
    }

    fn clear_token(&self) -> Result<(), TokenStoreError> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.remove(OAUTH_TOKEN_KEY);
        self.write_entries(&entries)?;
        tracing::info!(path = %self.path.display(), "OAuth token cleared");
        Ok(())
    }
}
