//! ACME secret persistence
//!
//! The secret-store collaborator: a keyed get/put of the ACME challenge
//! record. The singleton key keeps exactly one current challenge, matching
//! how certificate issuers probe the well-known path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Store key under which the single current ACME secret lives.
pub const CHALLENGE_ENTITY_ID: &str = "acme-secret-singleton";

/// The stored ACME challenge record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcmeSecret {
    /// Token part of the challenge URL.
    pub challenge: String,
    /// Expected response body for that token.
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub updated_by: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("secret {0:?} not found")]
    NotFound(String),
    #[error("secret store I/O failed")]
    Io(#[from] std::io::Error),
    #[error("malformed secret record")]
    Corrupt(#[from] serde_json::Error),
}

/// Keyed document store for ACME secrets.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<AcmeSecret, StoreError>;
    async fn put(&self, key: &str, secret: &AcmeSecret) -> Result<(), StoreError>;
}

/// One JSON document per key under a configured directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl SecretStore for FileStore {
    async fn get(&self, key: &str) -> Result<AcmeSecret, StoreError> {
        let path = self.path_for(key);
        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(key.to_string()));
            }
            Err(e) => return Err(StoreError::Io(e)),
        };
        Ok(serde_json::from_slice(&data)?)
    }

    async fn put(&self, key: &str, secret: &AcmeSecret) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let data = serde_json::to_vec_pretty(secret)?;
        // Write to a sibling temp file first so readers never observe a
        // half-written record.
        let path = self.path_for(key);
        let tmp = tmp_path(&path);
        tokio::fs::write(&tmp, &data).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// In-memory store used by tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryStore {
    secrets: RwLock<HashMap<String, AcmeSecret>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecretStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<AcmeSecret, StoreError> {
        let secrets = self.secrets.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        secrets
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn put(&self, key: &str, secret: &AcmeSecret) -> Result<(), StoreError> {
        let mut secrets = self.secrets.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        secrets.insert(key.to_string(), secret.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(challenge: &str) -> AcmeSecret {
        AcmeSecret {
            challenge: challenge.to_string(),
            response: format!("{challenge}.signature"),
            timestamp: Utc::now(),
            updated_by: "admin@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn memory_store_round_trips() {
        let store = MemoryStore::new();
        let entry = secret("tok");
        store.put(CHALLENGE_ENTITY_ID, &entry).await.unwrap();
        let loaded = store.get(CHALLENGE_ENTITY_ID).await.unwrap();
        assert_eq!(loaded, entry);
    }

    #[tokio::test]
    async fn memory_store_missing_key_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get(CHALLENGE_ENTITY_ID).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let entry = secret("tok");
        store.put(CHALLENGE_ENTITY_ID, &entry).await.unwrap();
        let loaded = store.get(CHALLENGE_ENTITY_ID).await.unwrap();
        assert_eq!(loaded, entry);
        assert!(!dir.path().join("acme-secret-singleton.json.tmp").exists());
    }

    #[tokio::test]
    async fn file_store_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.get(CHALLENGE_ENTITY_ID).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn file_store_corrupt_record_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("acme-secret-singleton.json"), b"not json").unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.get(CHALLENGE_ENTITY_ID).await,
            Err(StoreError::Corrupt(_))
        ));
    }
}
