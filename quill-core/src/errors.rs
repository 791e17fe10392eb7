use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The entry cannot be stored as-is (missing id/user, or an unusable key segment).
    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    #[error("object not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("metadata error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}
