//! In-process object store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::{ObjectInfo, ObjectStore, StorageError};

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    content_type: Option<String>,
}

impl StoredObject {
    fn info(&self, key: &str) -> ObjectInfo {
        ObjectInfo {
            key: key.to_string(),
            size: self.data.len() as u64,
            content_type: self.content_type.clone(),
        }
    }
}

/// Objects held in a sorted map. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<BTreeMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.map(str::to_string),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        self.objects
            .read()
            .await
            .get(key)
            .map(|object| object.data.clone())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn head(&self, key: &str) -> Result<Option<ObjectInfo>, StorageError> {
        Ok(self.objects.read().await.get(key).map(|object| object.info(key)))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>, StorageError> {
        Ok(self
            .objects
            .read()
            .await
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, object)| object.info(key))
            .collect())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.objects.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn put_get_delete() {
        let store = MemoryObjectStore::new();
        store
            .put("sessions/1/a.pdf", Bytes::from_static(b"abc"), None)
            .await
            .unwrap();

        assert_eq!(store.get("sessions/1/a.pdf").await.unwrap(), Bytes::from_static(b"abc"));
        assert_eq!(store.head("sessions/1/a.pdf").await.unwrap().unwrap().size, 3);

        store.delete("sessions/1/a.pdf").await.unwrap();
        assert_matches!(store.get("sessions/1/a.pdf").await, Err(StorageError::NotFound(_)));
        assert!(store.head("sessions/1/a.pdf").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn head_reports_content_type() {
        let store = MemoryObjectStore::new();
        store
            .put("sessions/1/a.pdf", Bytes::from_static(b"%PDF"), Some("application/pdf"))
            .await
            .unwrap();

        let info = store.head("sessions/1/a.pdf").await.unwrap().unwrap();
        assert_eq!(info.content_type.as_deref(), Some("application/pdf"));
    }

    #[tokio::test]
    async fn list_filters_by_prefix() {
        let store = MemoryObjectStore::new();
        for key in ["sessions/1/a", "sessions/1/b", "sessions/10/c", "other/d"] {
            store.put(key, Bytes::from_static(b"x"), None).await.unwrap();
        }

        let keys: Vec<String> = store
            .list("sessions/1/")
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.key)
            .collect();
        assert_eq!(keys, vec!["sessions/1/a", "sessions/1/b"]);
        assert_eq!(store.list("").await.unwrap().len(), 4);
    }
}
