mod blob_store;
mod entry_store;
mod fs_store;
mod memory_store;
mod metadata;
mod storage_paths;

pub use blob_store::{BlobStore, ObjectHead, ObjectMetadata, ObjectSummary, StoredObject};
pub use entry_store::{ENTRY_CONTENT_TYPE, EntryStore};
pub use fs_store::FsBlobStore;
pub use memory_store::MemoryBlobStore;
pub use metadata::{EntryMetadata, MetadataKey, ResolvedMetadata};
pub use storage_paths::{ENTRY_EXTENSION, USERS_PREFIX, entry_id_from_key, entry_key, user_prefix};
