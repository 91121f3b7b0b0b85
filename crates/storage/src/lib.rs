//! Object storage for session materials.
//!
//! [`ObjectStore`] is the seam between the API and the blob backend.
//! [`S3ObjectStore`] talks to any S3-compatible service (AWS, Cloudflare R2);
//! [`MemoryObjectStore`] keeps objects in process for local runs and tests.

pub mod memory;
pub mod migrate;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

pub use memory::MemoryObjectStore;
pub use migrate::{migrate_objects, MigrationReport};
pub use s3::{S3Config, S3ObjectStore};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for object storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No object exists under the key.
    #[error("Object not found: {0}")]
    NotFound(String),

    /// The backend rejected or failed the request.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Required configuration is missing or invalid.
    #[error("Storage configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// ObjectStore
// ---------------------------------------------------------------------------

/// Key, size and content type of a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectInfo {
    pub key: String,
    pub size: u64,
    /// Always filled by `head`; listings may leave it out.
    pub content_type: Option<String>,
}

/// Minimal blob store interface.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key`, replacing any existing object.
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), StorageError>;

    /// Fetch an object's bytes. Fails with [`StorageError::NotFound`] if absent.
    async fn get(&self, key: &str) -> Result<Bytes, StorageError>;

    /// Metadata of an object, or `None` if it does not exist.
    async fn head(&self, key: &str) -> Result<Option<ObjectInfo>, StorageError>;

    /// Every object whose key starts with `prefix`, in key order.
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>, StorageError>;

    /// Remove an object. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
