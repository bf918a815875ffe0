//! Key-value storage for collaborators around the form.
//!
//! The validation engine never touches storage. Front ends use it to keep
//! small JSON documents between runs, such as the last registration.

mod backend;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;

/// JSON documents by key, on top of any [`StorageBackend`].
///
/// Values go through `serde_json` on the way in and out; a stored document
/// that no longer fits the requested type is a
/// [`StorageError::Deserialization`].
///
/// # Example
///
/// ```
/// use enroll_lib::storage::{MemoryStorage, StorageProvider};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let storage = StorageProvider::new(MemoryStorage::new());
/// storage.set("favorites", &vec![3, 7]).await.unwrap();
/// let favorites: Option<Vec<u32>> = storage.get("favorites").await.unwrap();
/// assert_eq!(favorites, Some(vec![3, 7]));
/// # });
/// ```
#[derive(Clone)]
pub struct StorageProvider {
    backend: Arc<dyn StorageBackend>,
}

impl StorageProvider {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Read and decode the document stored under `key`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.backend.get_raw(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(StorageError::Deserialization)
    }

    /// Encode `value` and store it under `key`, replacing any previous document.
    pub async fn set<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(StorageError::Serialization)?;
        self.backend.set_raw(key, raw).await
    }
}
