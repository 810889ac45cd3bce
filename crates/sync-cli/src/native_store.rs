//! Native document store backed by tokio::fs.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

use sync_core::store::{DocumentStore, Result, StoreError};

/// Document store rooted at the vault directory; all paths are
/// resolved relative to it.
pub struct NativeStore {
    base_path: PathBuf,
}

impl NativeStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

#[async_trait]
impl DocumentStore for NativeStore {
    async fn read(&self, path: &str) -> Result<String> {
        let full_path = self.full_path(path);
        fs::read_to_string(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(path.to_string())
            } else {
                StoreError::Io(e.to_string())
            }
        })
    }

    async fn write(&self, path: &str, text: &str) -> Result<()> {
        let full_path = self.full_path(path);
        fs::write(&full_path, text)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.full_path(path).exists())
    }

    async fn create(&self, path: &str, initial: &str) -> Result<()> {
        let full_path = self.full_path(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io(e.to_string()))?;
        }

        fs::write(&full_path, initial)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))
    }
}
