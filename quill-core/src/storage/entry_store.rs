//! The storage gateway: the only place that maps `(user_id, entry_id)` to stored objects.
use super::blob_store::BlobStore;
use super::storage_paths::{entry_key, user_prefix};
use crate::entry::{Entry, EntrySummary};
use crate::errors::StorageError;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, trace};

pub const ENTRY_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

/// Persists entries as one markdown object per entry at `users/{user_id}/{entry_id}.md`.
#[derive(Clone)]
pub struct EntryStore {
    blobs: Arc<dyn BlobStore>,
}

impl EntryStore {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// Writes the entry body and metadata, overwriting whatever is stored.
    ///
    /// Fails with [`StorageError::InvalidEntry`] before touching storage when the
    /// entry has no user id or no id.
    pub async fn save(&self, entry: &Entry) -> Result<(), StorageError> {
        let user_id = entry
            .user_id
            .as_deref()
            .ok_or_else(|| StorageError::InvalidEntry("entry has no user id".into()))?;
        let entry_id = entry
            .id
            .as_deref()
            .ok_or_else(|| StorageError::InvalidEntry("entry has no id".into()))?;
        let key = entry_key(user_id, entry_id)?;

        debug!(user_id, entry_id, size = entry.content.len(), "saving entry");
        self.blobs
            .put_object(
                &key,
                entry.content.clone().into_bytes(),
                ENTRY_CONTENT_TYPE,
                entry.to_storage_metadata().to_object_metadata(),
            )
            .await
    }

    /// Fetches one entry with its content.
    pub async fn get(&self, user_id: &str, entry_id: &str) -> Result<Entry, StorageError> {
        let key = entry_key(user_id, entry_id)?;
        debug!(user_id, entry_id, "fetching entry");
        let object = self.blobs.get_object(&key).await?;
        Ok(Entry::from_storage_object_with_body(&object, user_id, entry_id))
    }

    /// Lists the user's entries without content, newest `date` first.
    ///
    /// Entries sharing a date keep the listing order (ascending key). Metadata for
    /// every object is fetched concurrently. Objects that vanish between the
    /// listing and the metadata fetch are skipped.
    pub async fn list(&self, user_id: &str) -> Result<Vec<EntrySummary>, StorageError> {
        let prefix = user_prefix(user_id)?;
        let objects = self.blobs.list_objects(&prefix).await?;
        debug!(user_id, count = objects.len(), "listing entries");

        let heads = join_all(
            objects
                .iter()
                .map(|object| self.blobs.head_object(&object.key)),
        )
        .await;

        let mut summaries = Vec::with_capacity(heads.len());
        for head in heads {
            match head {
                Ok(head) => summaries.push(Entry::from_storage_object(&head, user_id).to_summary()),
                Err(StorageError::NotFound(key)) => {
                    trace!(%key, "object disappeared while listing");
                }
                Err(e) => return Err(e),
            }
        }

        summaries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(summaries)
    }

    /// Removes an entry. Removing a missing entry is not an error.
    pub async fn delete(&self, user_id: &str, entry_id: &str) -> Result<(), StorageError> {
        let key = entry_key(user_id, entry_id)?;
        debug!(user_id, entry_id, "deleting entry");
        self.blobs.delete_object(&key).await
    }

    pub async fn exists(&self, user_id: &str, entry_id: &str) -> Result<bool, StorageError> {
        let key = entry_key(user_id, entry_id)?;
        match self.blobs.head_object(&key).await {
            Ok(_) => Ok(true),
            Err(StorageError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
