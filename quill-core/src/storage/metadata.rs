//! Typed view of the metadata stored next to each entry body.
//!
//! On the wire the metadata is a flat string map (`title`, `date`, `preview`,
//! `created-at`, `updated-at`) with percent-encoded values, so any backend that
//! only accepts ASCII metadata can hold it. Reading goes through a single
//! fallback rule per field: stored value, then the object's last-modified time,
//! then a fixed default.

use super::blob_store::ObjectMetadata;
use crate::entry::DEFAULT_TITLE;
use crate::entry::timestamps::{format_timestamp, parse_timestamp};
use chrono::{DateTime, Utc};
use strum_macros::{AsRefStr, EnumIter};
use strum::IntoEnumIterator;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum MetadataKey {
    Title,
    Date,
    Preview,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryMetadata {
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub preview: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Metadata with every field resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMetadata {
    pub title: String,
    pub date: DateTime<Utc>,
    pub preview: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EntryMetadata {
    pub fn to_object_metadata(&self) -> ObjectMetadata {
        let mut map = ObjectMetadata::new();
        for key in MetadataKey::iter() {
            let value = match key {
                MetadataKey::Title => self.title.clone(),
                MetadataKey::Date => self.date.as_ref().map(format_timestamp),
                MetadataKey::Preview => self.preview.clone(),
                MetadataKey::CreatedAt => self.created_at.as_ref().map(format_timestamp),
                MetadataKey::UpdatedAt => self.updated_at.as_ref().map(format_timestamp),
            };
            if let Some(value) = value {
                map.insert(key.as_ref().to_string(), urlencoding::encode(&value).into_owned());
            }
        }
        map
    }

    /// Decodes a stored metadata map. Unknown keys are ignored; undecodable
    /// values count as missing.
    pub fn from_object_metadata(map: &ObjectMetadata) -> Self {
        let text = |key: MetadataKey| -> Option<String> {
            let raw = map.get(key.as_ref())?;
            match urlencoding::decode(raw) {
                Ok(value) => Some(value.into_owned()),
                Err(e) => {
                    trace!(key = key.as_ref(), error = %e, "undecodable metadata value");
                    None
                }
            }
        };
        let timestamp = |key: MetadataKey| text(key).and_then(|v| parse_timestamp(&v));

        EntryMetadata {
            title: text(MetadataKey::Title).filter(|t| !t.is_empty()),
            date: timestamp(MetadataKey::Date),
            preview: text(MetadataKey::Preview),
            created_at: timestamp(MetadataKey::CreatedAt),
            updated_at: timestamp(MetadataKey::UpdatedAt),
        }
    }

    /// Applies the fallback rule: stored value, then `last_modified`, then the fixed default.
    pub fn resolve(self, last_modified: DateTime<Utc>) -> ResolvedMetadata {
        ResolvedMetadata {
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            date: self.date.unwrap_or(last_modified),
            preview: self.preview.unwrap_or_default(),
            created_at: self.created_at.unwrap_or(last_modified),
            updated_at: self.updated_at.unwrap_or(last_modified),
        }
    }
}
