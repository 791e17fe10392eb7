//! Blob store backed by a local directory tree.
//!
//! Layout under the root directory:
//! - `objects/{key}`: the object body.
//! - `meta/{key}.json`: content type and user metadata.
//!
//! Writes go to a temporary file next to the target and are renamed into place.
//! The sidecar is written first; if the body then fails, the previous sidecar is put back.

use super::blob_store::{BlobStore, ObjectHead, ObjectMetadata, ObjectSummary, StoredObject};
use crate::errors::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, trace, warn};

const OBJECTS_DIR: &str = "objects";
const META_DIR: &str = "meta";
const META_SUFFIX: &str = ".json";
const TMP_INFIX: &str = ".tmp.";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Serialize, Deserialize)]
struct Sidecar {
    content_type: String,
    #[serde(default)]
    metadata: ObjectMetadata,
}

#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root_dir: PathBuf,
}

impl FsBlobStore {
    /// Opens (and creates if needed) a store rooted at `root_dir`.
    pub async fn new<P: AsRef<Path>>(root_dir: P) -> Result<Self, StorageError> {
        let root_dir = root_dir.as_ref().to_path_buf();
        fs::create_dir_all(root_dir.join(OBJECTS_DIR)).await?;
        fs::create_dir_all(root_dir.join(META_DIR)).await?;
        info!(path = %root_dir.display(), "opened blob store");
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        Ok(self.root_dir.join(OBJECTS_DIR).join(checked_key(key)?))
    }

    fn meta_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let key = checked_key(key)?;
        Ok(self
            .root_dir
            .join(META_DIR)
            .join(format!("{key}{META_SUFFIX}")))
    }

    async fn read_head(&self, key: &str) -> Result<ObjectHead, StorageError> {
        let path = self.object_path(key)?;
        let file_meta = fs::metadata(&path).await.map_err(|e| not_found_or(e, key))?;
        if !file_meta.is_file() {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let sidecar = match fs::read(self.meta_path(key)?).await {
            Ok(raw) => match serde_json::from_slice::<Sidecar>(&raw) {
                Ok(sidecar) => Some(sidecar),
                Err(e) => {
                    warn!(key, error = %e, "ignoring unreadable metadata sidecar");
                    None
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        let (content_type, metadata) = match sidecar {
            Some(s) => (s.content_type, s.metadata),
            None => (DEFAULT_CONTENT_TYPE.to_string(), ObjectMetadata::new()),
        };

        Ok(ObjectHead {
            key: key.to_string(),
            content_type,
            metadata,
            size: file_meta.len(),
            last_modified: modified_time(&file_meta),
        })
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        metadata: ObjectMetadata,
    ) -> Result<(), StorageError> {
        let object_path = self.object_path(key)?;
        let meta_path = self.meta_path(key)?;
        debug!(key, size = body.len(), "writing object");

        let sidecar = serde_json::to_vec(&Sidecar {
            content_type: content_type.to_string(),
            metadata,
        })?;
        let previous = match fs::read(&meta_path).await {
            Ok(raw) => Some(raw),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        write_atomically(&meta_path, &sidecar).await?;
        if let Err(e) = write_atomically(&object_path, &body).await {
            restore_sidecar(&meta_path, previous).await;
            return Err(e);
        }
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<StoredObject, StorageError> {
        let head = self.read_head(key).await?;
        let body = fs::read(self.object_path(key)?)
            .await
            .map_err(|e| not_found_or(e, key))?;
        trace!(key, size = body.len(), "read object");
        Ok(StoredObject { head, body })
    }

    async fn head_object(&self, key: &str) -> Result<ObjectHead, StorageError> {
        self.read_head(key).await
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectSummary>, StorageError> {
        let objects_root = self.root_dir.join(OBJECTS_DIR);
        // Only the directory part of the prefix can be walked; the rest is matched on keys.
        let (dir_part, _) = prefix.rsplit_once('/').unwrap_or(("", prefix));
        let start = if dir_part.is_empty() {
            objects_root.clone()
        } else {
            objects_root.join(checked_key(dir_part)?)
        };

        let mut found = Vec::new();
        let mut pending = vec![start];
        while let Some(dir) = pending.pop() {
            let mut read = match fs::read_dir(&dir).await {
                Ok(read) => read,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            while let Some(entry) = read.next_entry().await? {
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                    continue;
                }
                if entry.file_name().to_string_lossy().contains(TMP_INFIX) {
                    continue;
                }
                let Some(key) = key_for_path(&objects_root, &entry.path()) else {
                    continue;
                };
                if !key.starts_with(prefix) {
                    continue;
                }
                let file_meta = entry.metadata().await?;
                found.push(ObjectSummary {
                    key,
                    size: file_meta.len(),
                    last_modified: modified_time(&file_meta),
                });
            }
        }

        found.sort_by(|a, b| a.key.cmp(&b.key));
        debug!(prefix, count = found.len(), "listed objects");
        Ok(found)
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        debug!(key, "deleting object");
        for path in [self.object_path(key)?, self.meta_path(key)?] {
            match fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

/// Rejects keys that would resolve outside the store root.
fn checked_key(key: &str) -> Result<&str, StorageError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if bad {
        return Err(StorageError::Backend(format!("unusable object key '{key}'")));
    }
    Ok(key)
}

fn key_for_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let segments: Option<Vec<&str>> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect();
    Some(segments?.join("/"))
}

fn modified_time(meta: &std::fs::Metadata) -> DateTime<Utc> {
    meta.modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_default()
        .trunc_subsecs(3)
}

fn not_found_or(e: std::io::Error, key: &str) -> StorageError {
    match e.kind() {
        ErrorKind::NotFound => StorageError::NotFound(key.to_string()),
        _ => StorageError::Io(e),
    }
}

async fn restore_sidecar(meta_path: &Path, previous: Option<Vec<u8>>) {
    let restored = match previous {
        Some(raw) => write_atomically(meta_path, &raw).await,
        None => fs::remove_file(meta_path).await.map_err(StorageError::from),
    };
    if let Err(e) = restored {
        warn!(path = %meta_path.display(), error = %e, "failed to restore metadata sidecar");
    }
}

async fn write_atomically(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!(
        "{file_name}{TMP_INFIX}{:016x}",
        rand::random::<u64>()
    ));
    trace!(path = %tmp_path.display(), "writing temporary file");
    fs::write(&tmp_path, data).await?;
    if let Err(e) = fs::rename(&tmp_path, path).await {
        warn!(path = %path.display(), error = %e, "failed to move temporary file into place");
        if let Err(e) = fs::remove_file(&tmp_path).await {
            warn!(path = %tmp_path.display(), error = %e, "failed to remove temporary file");
        }
        return Err(e.into());
    }
    Ok(())
}
