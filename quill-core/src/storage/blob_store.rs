//! Key-value object storage the entry gateway is built on.
use crate::errors::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// User metadata attached to an object. Keys and values are expected to be ASCII.
pub type ObjectMetadata = BTreeMap<String, String>;

/// Everything known about an object except its body.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectHead {
    pub key: String,
    pub content_type: String,
    pub metadata: ObjectMetadata,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub head: ObjectHead,
    pub body: Vec<u8>,
}

/// One row of a listing. Listings do not carry user metadata; fetch the head for that.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// A blob store: single-object put/get/head/delete plus prefix listing.
///
/// Each single-object call is atomic; there are no transactions across calls.
/// Missing keys are reported as [`StorageError::NotFound`].
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Writes `body` at `key`, replacing any existing object.
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        metadata: ObjectMetadata,
    ) -> Result<(), StorageError>;

    async fn get_object(&self, key: &str) -> Result<StoredObject, StorageError>;

    async fn head_object(&self, key: &str) -> Result<ObjectHead, StorageError>;

    /// Lists every object whose key starts with `prefix`, ordered by key.
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectSummary>, StorageError>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;
}
