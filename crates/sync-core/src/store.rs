//! DocumentStore trait abstraction for the host document storage.
//!
//! Implementations:
//! - `InMemoryStore` - For testing
//! - `NativeStore` (in sync-cli) - Uses tokio::fs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Storage abstraction for the sync document.
///
/// The store owns the document text; the sync core only borrows it for
/// the duration of one pass.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read document contents.
    async fn read(&self, path: &str) -> Result<String>;

    /// Overwrite document contents.
    async fn write(&self, path: &str, text: &str) -> Result<()>;

    /// Check if the document exists.
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Create a new document with initial text, creating parent
    /// folders as needed.
    async fn create(&self, path: &str, initial: &str) -> Result<()>;
}

/// In-memory document store for testing.
pub struct InMemoryStore {
    files: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn read(&self, path: &str) -> Result<String> {
        let files = self.files.read().unwrap();
        files
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    async fn write(&self, path: &str, text: &str) -> Result<()> {
        let mut files = self.files.write().unwrap();
        files.insert(path.to_string(), text.to_string());
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let files = self.files.read().unwrap();
        Ok(files.contains_key(path))
    }

    async fn create(&self, path: &str, initial: &str) -> Result<()> {
        // No real folders in memory; creation is just a write.
        self.write(path, initial).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn basic_operations() {
        let store = InMemoryStore::new();

        assert!(!store.exists("tasks.md").await.unwrap());
        assert!(matches!(
            store.read("tasks.md").await,
            Err(StoreError::NotFound(_))
        ));

        store.create("tasks.md", "").await.unwrap();
        assert!(store.exists("tasks.md").await.unwrap());
        assert_eq!(store.read("tasks.md").await.unwrap(), "");

        store.write("tasks.md", "# [ENG-1] Fix bug\n").await.unwrap();
        assert_eq!(store.read("tasks.md").await.unwrap(), "# [ENG-1] Fix bug\n");
    }
}
