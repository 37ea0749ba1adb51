use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use directories::BaseDirs;

/// Opaque credential store gating the dashboard surfaces.
///
/// Session state is passed in at construction wherever a token is needed;
/// nothing reads the store ambiently. Token handling stays a naive local
/// store on purpose.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// File-backed store under the user's home directory.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default token location, `~/.ollachat/token`.
    pub fn default_location() -> Result<Self> {
        let base = BaseDirs::new().context("could not determine home directory")?;
        Ok(Self::new(base.home_dir().join(".ollachat").join("token")))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<String> {
        let token = fs::read_to_string(&self.path).ok()?;
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    fn set(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token.trim())
            .with_context(|| format!("failed to write token to {}", self.path.display()))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store, for tests and embedded callers.
#[derive(Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn set(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap() = Some(token.trim().to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested").join("token"));

        assert_eq!(store.get(), None);
        store.set("  tok-123  ").unwrap();
        assert_eq!(store.get(), Some("tok-123".to_string()));
        store.clear().unwrap();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn clearing_a_missing_token_is_fine() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path().join("token"));
        store.clear().unwrap();
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.get(), None);
        store.set("abc").unwrap();
        assert_eq!(store.get(), Some("abc".to_string()));
        store.clear().unwrap();
        assert_eq!(store.get(), None);
    }
}
