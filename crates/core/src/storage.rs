use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tokio::sync::RwLock;

use crate::model::LanguageData;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed stored mapping: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage path exists but is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("invalid language code for storage: {0:?}")]
    InvalidLanguage(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredMapping {
    pub data: LanguageData,
    pub timestamp: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait MappingStorage: Send + Sync {
    async fn save_mapping(&self, data: LanguageData) -> Result<(), StorageError>;
    async fn get_mapping(&self, language: &str) -> Option<StoredMapping>;
}

/// In-memory storage, keyed by language code.
#[derive(Default, Clone)]
pub struct MemoryStorage {
    inner: Arc<RwLock<HashMap<String, StoredMapping>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl MappingStorage for MemoryStorage {
    async fn save_mapping(&self, data: LanguageData) -> Result<(), StorageError> {
        let key = data.language.clone();
        let stored = StoredMapping {
            data,
            timestamp: Utc::now(),
        };
        self.inner.write().await.insert(key, stored);
        Ok(())
    }

    async fn get_mapping(&self, language: &str) -> Option<StoredMapping> {
        self.inner.read().await.get(language).cloned()
    }
}

/// Persists each language's mapping as `mapping-{language}.json` under `root`.
#[derive(Clone, Debug)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, language: &str) -> Result<PathBuf, StorageError> {
        let valid = !language.is_empty()
            && language
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'));
        if !valid {
            return Err(StorageError::InvalidLanguage(language.to_string()));
        }
        Ok(self.root.join(format!("mapping-{language}.json")))
    }

    async fn ensure_root(&self) -> Result<(), StorageError> {
        match fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(StorageError::NotADirectory(self.root.clone())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                fs::create_dir_all(&self.root).await?;
                Ok(())
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    /// Like [`MappingStorage::get_mapping`] but reports why nothing was loaded.
    pub async fn load(&self, language: &str) -> Result<StoredMapping, StorageError> {
        let path = self.path_for(language)?;
        let raw = fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[async_trait::async_trait]
impl MappingStorage for FileStorage {
    async fn save_mapping(&self, data: LanguageData) -> Result<(), StorageError> {
        let path = self.path_for(&data.language)?;
        self.ensure_root().await?;
        let stored = StoredMapping {
            data,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        fs::write(&path, json).await?;
        log::debug!("saved mapping to {}", path.display());
        Ok(())
    }

    async fn get_mapping(&self, language: &str) -> Option<StoredMapping> {
        match self.load(language).await {
            Ok(stored) => Some(stored),
            Err(e) => {
                log::debug!("no stored mapping for {language}: {e}");
                None
            }
        }
    }
}
