use super::blob_store::{BlobStore, ObjectHead, ObjectMetadata, ObjectSummary, StoredObject};
use crate::entry::timestamps::now;
use crate::errors::StorageError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::trace;

/// Blob store kept entirely in memory. Contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: RwLock<BTreeMap<String, StoredObject>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        metadata: ObjectMetadata,
    ) -> Result<(), StorageError> {
        trace!(key, size = body.len(), "memory put");
        let head = ObjectHead {
            key: key.to_string(),
            content_type: content_type.to_string(),
            metadata,
            size: body.len() as u64,
            last_modified: now(),
        };
        self.objects
            .write()
            .await
            .insert(key.to_string(), StoredObject { head, body });
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<StoredObject, StorageError> {
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn head_object(&self, key: &str) -> Result<ObjectHead, StorageError> {
        self.objects
            .read()
            .await
            .get(key)
            .map(|object| object.head.clone())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectSummary>, StorageError> {
        let objects = self.objects.read().await;
        Ok(objects
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, object)| ObjectSummary {
                key: key.clone(),
                size: object.head.size,
                last_modified: object.head.last_modified,
            })
            .collect())
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        trace!(key, "memory delete");
        self.objects.write().await.remove(key);
        Ok(())
    }
}
