use hyper::StatusCode;
use quill_core::StorageError;
use serde_json::{Value, json};
use thiserror::Error;

/// Everything a request can fail with. Each variant maps to exactly one status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation { message: String, errors: Vec<String> },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("storage failure: {0}")]
    Storage(#[source] StorageError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// A 400 without field-level details.
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn validation_failed(errors: Vec<String>) -> Self {
        ApiError::Validation {
            message: "Validation failed".to_string(),
            errors,
        }
    }

    pub fn entry_not_found() -> Self {
        ApiError::NotFound("Entry not found".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// `{"message": ..}`, plus `errors` for validation failures and `error` for 500s.
    pub fn to_body(&self) -> Value {
        match self {
            ApiError::Validation { message, errors } if errors.is_empty() => {
                json!({ "message": message })
            }
            ApiError::Validation { message, errors } => {
                json!({ "message": message, "errors": errors })
            }
            ApiError::Storage(e) => json!({
                "message": "Internal server error",
                "error": e.to_string(),
            }),
            ApiError::Internal(cause) => json!({
                "message": "Internal server error",
                "error": cause,
            }),
            other => json!({ "message": other.to_string() }),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(_) => ApiError::entry_not_found(),
            StorageError::InvalidEntry(reason) => ApiError::Validation {
                message: "Invalid entry".to_string(),
                errors: vec![reason],
            },
            other => ApiError::Storage(other),
        }
    }
}
