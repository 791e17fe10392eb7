pub mod autosave;
pub mod config;
pub mod entry;
pub mod errors;
pub mod storage;

pub use config::{ClientConfig, Config};
pub use entry::{Entry, EntryChanges, EntryFields, EntrySummary};
pub use errors::StorageError;
pub use storage::{BlobStore, EntryStore, FsBlobStore, MemoryBlobStore};
