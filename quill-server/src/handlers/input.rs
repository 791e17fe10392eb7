use crate::errors::ApiError;
use chrono::{DateTime, Utc};
use quill_core::entry::timestamps::parse_timestamp;
use serde::Deserialize;

/// Request body of `POST /entries` and `PUT /entries/{id}`.
///
/// Fields the server owns (`id`, `userId`, `preview`, `createdAt`, `updatedAt`)
/// are ignored when a client sends them.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryInput {
    pub title: Option<String>,
    pub content: String,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawEntryInput {
    title: Option<String>,
    content: Option<String>,
    date: Option<String>,
}

impl EntryInput {
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        let raw: RawEntryInput =
            serde_json::from_slice(body).map_err(|_| ApiError::bad_request("Invalid JSON body"))?;

        let content = raw
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ApiError::bad_request("Content is required"))?;

        let date = match raw.date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(date) => Some(
                parse_timestamp(date)
                    .ok_or_else(|| ApiError::bad_request(format!("Invalid date '{date}'")))?,
            ),
        };

        Ok(Self {
            title: raw.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
            content,
            date,
        })
    }
}
