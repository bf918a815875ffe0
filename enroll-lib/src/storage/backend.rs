//! Raw document storage.

use async_trait::async_trait;

use crate::error::StorageError;

/// Where [`StorageProvider`](super::StorageProvider) keeps its documents.
///
/// Values are JSON text that the backend stores verbatim.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// The JSON text under `key`, or `None` if nothing was stored.
    async fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set_raw(&self, key: &str, value: String) -> Result<(), StorageError>;
}
