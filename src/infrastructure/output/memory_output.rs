//! In-memory project store, used for dry runs

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::application::{ApplicationError, ProjectStore};
use crate::generation::Artifact;

/// Project store that keeps every file in memory
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    files: RwLock<BTreeMap<PathBuf, String>>,
    directories: RwLock<BTreeSet<PathBuf>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every file, ordered by path
    pub async fn files(&self) -> BTreeMap<PathBuf, String> {
        self.files.read().await.clone()
    }

    /// Snapshot of every directory created explicitly, ordered by path
    pub async fn directories(&self) -> BTreeSet<PathBuf> {
        self.directories.read().await.clone()
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn read_file(&self, path: &Path) -> Result<Option<String>, ApplicationError> {
        Ok(self.files.read().await.get(path).cloned())
    }

    async fn exists(&self, path: &Path) -> bool {
        self.files.read().await.contains_key(path)
    }

    async fn write_artifacts(&self, artifacts: &[Artifact]) -> Result<(), ApplicationError> {
        let mut files = self.files.write().await;
        for artifact in artifacts {
            files.insert(artifact.path.clone(), artifact.content.clone());
        }
        Ok(())
    }

    async fn ensure_directory(&self, path: &Path) -> Result<(), ApplicationError> {
        self.directories.write().await.insert(path.to_path_buf());
        Ok(())
    }
}
