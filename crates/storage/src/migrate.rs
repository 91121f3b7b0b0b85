//! Bucket-to-bucket copy used when moving storage providers.
//!
//! Objects already present at the destination with the same size are
//! skipped, so the copy can be re-run after a partial failure. The source
//! object's content type is kept on the copy.

use serde::Serialize;

use crate::{ObjectInfo, ObjectStore, StorageError};

/// Outcome of a [`migrate_objects`] run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct MigrationReport {
    pub copied: Vec<String>,
    pub skipped: Vec<String>,
    /// `(key, error)` for every object that could not be copied.
    pub failed: Vec<(String, String)>,
}

impl MigrationReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Copy every object under `prefix` from `source` to `dest`.
///
/// Listing the source is fatal; per-object errors are recorded and the
/// copy continues.
pub async fn migrate_objects(
    source: &dyn ObjectStore,
    dest: &dyn ObjectStore,
    prefix: &str,
) -> Result<MigrationReport, StorageError> {
    let objects = source.list(prefix).await?;
    tracing::info!(prefix, total = objects.len(), "Starting object copy");

    let mut report = MigrationReport::default();
    for object in objects {
        match copy_one(source, dest, &object).await {
            Ok(true) => {
                tracing::info!(key = %object.key, size = object.size, "Copied");
                report.copied.push(object.key);
            }
            Ok(false) => {
                tracing::debug!(key = %object.key, "Already present, skipped");
                report.skipped.push(object.key);
            }
            Err(e) => {
                tracing::warn!(key = %object.key, error = %e, "Copy failed");
                report.failed.push((object.key, e.to_string()));
            }
        }
    }

    tracing::info!(
        copied = report.copied.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "Object copy finished",
    );
    Ok(report)
}

/// Returns `false` when the destination already holds an object of equal size.
async fn copy_one(
    source: &dyn ObjectStore,
    dest: &dyn ObjectStore,
    object: &ObjectInfo,
) -> Result<bool, StorageError> {
    if let Some(existing) = dest.head(&object.key).await? {
        if existing.size == object.size {
            return Ok(false);
        }
    }

    let content_type = match &object.content_type {
        Some(content_type) => Some(content_type.clone()),
        None => source
            .head(&object.key)
            .await?
            .and_then(|info| info.content_type),
    };

    let data = source.get(&object.key).await?;
    dest.put(&object.key, data, content_type.as_deref()).await?;
    Ok(true)
}
