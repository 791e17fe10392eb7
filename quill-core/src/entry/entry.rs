//! The `Entry` domain object and its client-facing representations.
use super::format_utils::{format_long_date, format_relative_time};
use super::preview::{DEFAULT_PREVIEW_LENGTH, clip_chars, generate_preview};
use super::timestamps::{iso8601, now};
use crate::storage::{EntryMetadata, ObjectHead, StoredObject, entry_id_from_key};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Untitled";
pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_CONTENT_BYTES: usize = 10 * 1024 * 1024;

/// One journal entry.
///
/// An entry without `id` is "new": it exists on the client only and gets its id
/// on the first successful save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "EntryFields")]
pub struct Entry {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub title: String,
    pub content: String,
    #[serde(with = "iso8601")]
    pub date: DateTime<Utc>,
    pub preview: String,
    #[serde(with = "iso8601")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "iso8601")]
    pub updated_at: DateTime<Utc>,
}

/// Loose field set an [`Entry`] is built from. Every field is optional; see [`Entry::new`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryFields {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(with = "iso8601::option")]
    pub date: Option<DateTime<Utc>>,
    pub preview: Option<String>,
    #[serde(with = "iso8601::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "iso8601::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A full replacement of the user-editable fields of an entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryChanges {
    pub title: Option<String>,
    pub content: String,
    /// `None` keeps the current date.
    pub date: Option<DateTime<Utc>>,
}

/// An entry without its content, as shown in list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySummary {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub title: String,
    #[serde(with = "iso8601")]
    pub date: DateTime<Utc>,
    pub preview: String,
    #[serde(with = "iso8601")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "iso8601")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl From<EntryFields> for Entry {
    fn from(fields: EntryFields) -> Self {
        Entry::new(fields)
    }
}

impl Entry {
    /// Builds an entry, filling every missing field with its default.
    ///
    /// - `title` becomes `"Untitled"` when missing or empty.
    /// - `content` and `preview` become empty strings.
    /// - `date`, `createdAt` and `updatedAt` become the current time.
    ///
    /// `updatedAt` never precedes `createdAt`; an earlier value is raised to it.
    pub fn new(fields: EntryFields) -> Self {
        let now = now();
        let created_at = fields.created_at.unwrap_or(now);
        let updated_at = fields.updated_at.unwrap_or(now).max(created_at);
        Entry {
            id: fields.id.filter(|id| !id.is_empty()),
            user_id: fields.user_id.filter(|id| !id.is_empty()),
            title: fields
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            content: fields.content.unwrap_or_default(),
            date: fields.date.unwrap_or(now),
            preview: fields.preview.unwrap_or_default(),
            created_at,
            updated_at,
        }
    }

    /// Rebuilds an entry from its client JSON representation.
    pub fn from_client_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Full client representation, content included.
    pub fn to_client_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn to_summary(&self) -> EntrySummary {
        EntrySummary {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            title: self.title.clone(),
            date: self.date,
            preview: self.preview.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Metadata-only client representation (no `content` key).
    pub fn to_summary_json(&self) -> serde_json::Value {
        serde_json::to_value(self.to_summary()).unwrap_or(serde_json::Value::Null)
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Plain-text excerpt of the content. Pure: does not touch `self.preview`.
    pub fn generate_preview(&self, max_length: usize) -> String {
        generate_preview(&self.content, max_length)
    }

    /// Regenerates `preview` from the current content.
    pub fn refresh_preview(&mut self) -> &mut Self {
        self.preview = self.generate_preview(DEFAULT_PREVIEW_LENGTH);
        self
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// Marks the entry as modified now.
    pub fn touch(&mut self) -> &mut Self {
        self.updated_at = now().max(self.updated_at).max(self.created_at);
        self
    }

    /// Replaces title, content and (optionally) date, then refreshes the preview and touches.
    pub fn apply(&mut self, changes: EntryChanges) -> &mut Self {
        self.title = changes
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        self.content = changes.content;
        if let Some(date) = changes.date {
            self.date = date;
        }
        self.refresh_preview();
        self.touch()
    }

    /// Checks the entry against the storage rules.
    ///
    /// Errors are reported in a fixed order: user id, title length, content size.
    /// Blank content is not checked here; callers that require content do it themselves.
    pub fn validate(&self) -> Validation {
        let mut errors = Vec::new();

        if self.user_id.is_none() {
            errors.push("userId is required".to_string());
        }
        if self.title.chars().count() > MAX_TITLE_CHARS {
            errors.push(format!(
                "title must be {MAX_TITLE_CHARS} characters or less"
            ));
        }
        if self.content.len() > MAX_CONTENT_BYTES {
            errors.push("content must be 10MB or less".to_string());
        }

        Validation {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Metadata attached to the stored object; the content is the object body.
    pub fn to_storage_metadata(&self) -> EntryMetadata {
        EntryMetadata {
            title: Some(self.title.clone()),
            date: Some(self.date),
            preview: Some(clip_chars(&self.preview, DEFAULT_PREVIEW_LENGTH).to_string()),
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }

    /// Rebuilds a content-less entry from a stored object's head.
    pub fn from_storage_object(object: &ObjectHead, user_id: &str) -> Self {
        let resolved = EntryMetadata::from_object_metadata(&object.metadata)
            .resolve(object.last_modified);
        Entry::new(EntryFields {
            id: Some(entry_id_from_key(&object.key).to_string()),
            user_id: Some(user_id.to_string()),
            title: Some(resolved.title),
            content: None,
            date: Some(resolved.date),
            preview: Some(resolved.preview),
            created_at: Some(resolved.created_at),
            updated_at: Some(resolved.updated_at),
        })
    }

    /// Rebuilds a full entry from a fetched object. The preview is derived from the
    /// body again, since the stored one is clipped.
    pub fn from_storage_object_with_body(
        object: &StoredObject,
        user_id: &str,
        entry_id: &str,
    ) -> Self {
        let mut entry = Self::from_storage_object(&object.head, user_id);
        entry.id = Some(entry_id.to_string());
        entry.content = String::from_utf8_lossy(&object.body).into_owned();
        entry.refresh_preview();
        entry
    }

    /// `August 15, 2025`
    pub fn formatted_date(&self) -> String {
        format_long_date(&self.date)
    }

    /// `3 hours ago`, relative to `now`.
    pub fn relative_time(&self, now: &DateTime<Utc>) -> String {
        format_relative_time(&self.date, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::timestamps::parse_timestamp;
    use crate::storage::ObjectMetadata;
    use chrono::{Duration, TimeZone};

    fn ts(s: &str) -> DateTime<Utc> {
        parse_timestamp(s).unwrap()
    }

    fn full_entry() -> Entry {
        Entry::new(EntryFields {
            id: Some("1700000000000-abc123xyz".into()),
            user_id: Some("user-1".into()),
            title: Some("Quiet morning".into()),
            content: Some("# Quiet morning\n\nCoffee and **rain**.".into()),
            date: Some(ts("2025-08-15T07:30:00.000Z")),
            preview: Some("Quiet morning Coffee and rain.".into()),
            created_at: Some(ts("2025-08-15T07:31:00.000Z")),
            updated_at: Some(ts("2025-08-15T07:45:00.000Z")),
        })
    }

    #[test]
    fn construct_fills_defaults() {
        let before = now();
        let e = Entry::new(EntryFields::default());
        assert!(e.is_new());
        assert_eq!(e.user_id, None);
        assert_eq!(e.title, "Untitled");
        assert_eq!(e.content, "");
        assert_eq!(e.preview, "");
        assert!(e.date >= before);
        assert!(e.created_at >= before);
        assert!(e.updated_at >= e.created_at);
    }

    #[test]
    fn empty_title_becomes_untitled() {
        let e = Entry::new(EntryFields {
            title: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(e.title, "Untitled");
    }

    #[test]
    fn updated_at_is_raised_to_created_at() {
        let e = Entry::new(EntryFields {
            created_at: Some(ts("2025-08-15T10:00:00.000Z")),
            updated_at: Some(ts("2025-08-15T09:00:00.000Z")),
            ..Default::default()
        });
        assert_eq!(e.updated_at, e.created_at);
    }

    #[test]
    fn client_json_round_trips_field_for_field() {
        let e = full_entry();
        let json = e.to_client_json().to_string();
        let back = Entry::from_client_json(&json).unwrap();
        assert_eq!(back, e);

        let fresh = Entry::new(EntryFields {
            content: Some("new".into()),
            ..Default::default()
        });
        let back = Entry::from_client_json(&fresh.to_client_json().to_string()).unwrap();
        assert_eq!(back, fresh);
    }

    #[test]
    fn client_json_uses_camel_case_and_iso_timestamps() {
        let json = full_entry().to_client_json();
        assert_eq!(json["userId"], "user-1");
        assert_eq!(json["createdAt"], "2025-08-15T07:31:00.000Z");
        assert_eq!(json["updatedAt"], "2025-08-15T07:45:00.000Z");
        assert_eq!(json["date"], "2025-08-15T07:30:00.000Z");
        assert!(json.get("content").is_some());
    }

    #[test]
    fn summary_json_has_no_content() {
        let json = full_entry().to_summary_json();
        assert!(json.get("content").is_none());
        assert_eq!(json["title"], "Quiet morning");
        assert_eq!(json["preview"], "Quiet morning Coffee and rain.");
        assert_eq!(json["id"], "1700000000000-abc123xyz");
    }

    #[test]
    fn client_json_accepts_missing_fields() {
        let e = Entry::from_client_json(r#"{"content":"Hello"}"#).unwrap();
        assert_eq!(e.title, "Untitled");
        assert_eq!(e.content, "Hello");
        assert!(e.is_new());
    }

    #[test]
    fn word_count_splits_on_whitespace_runs() {
        let mut e = full_entry();
        assert_eq!(e.word_count(), 6);
        e.content = "  one\n\ttwo   three ".into();
        assert_eq!(e.word_count(), 3);
        e.content = String::new();
        assert_eq!(e.word_count(), 0);
    }

    #[test]
    fn touch_never_moves_backwards() {
        let mut e = full_entry();
        let before = e.updated_at;
        e.touch();
        assert!(e.updated_at >= before);
        assert!(e.updated_at > ts("2025-08-15T07:45:00.000Z"));
    }

    #[test]
    fn touch_keeps_a_future_updated_at() {
        let mut e = full_entry();
        let future = now() + Duration::days(1);
        e.updated_at = future;
        e.touch();
        assert_eq!(e.updated_at, future);
    }

    #[test]
    fn apply_replaces_fields_and_refreshes_preview() {
        let mut e = full_entry();
        let created = e.created_at;
        e.apply(EntryChanges {
            title: None,
            content: "New *text*".into(),
            date: None,
        });
        assert_eq!(e.title, "Untitled");
        assert_eq!(e.content, "New *text*");
        assert_eq!(e.preview, "New text");
        assert_eq!(e.date, ts("2025-08-15T07:30:00.000Z"));
        assert_eq!(e.created_at, created);
        assert!(e.updated_at > ts("2025-08-15T07:45:00.000Z"));
    }

    #[test]
    fn validate_reports_errors_in_order() {
        let e = Entry::new(EntryFields {
            title: Some("t".repeat(201)),
            content: Some("c".repeat(MAX_CONTENT_BYTES + 1)),
            ..Default::default()
        });
        let v = e.validate();
        assert!(!v.is_valid);
        assert_eq!(
            v.errors,
            vec![
                "userId is required",
                "title must be 200 characters or less",
                "content must be 10MB or less",
            ]
        );
    }

    #[test]
    fn validate_accepts_limits_and_ignores_blank_content() {
        let e = Entry::new(EntryFields {
            user_id: Some("u".into()),
            title: Some("é".repeat(200)),
            content: Some("   ".into()),
            ..Default::default()
        });
        let v = e.validate();
        assert!(v.is_valid);
        assert_eq!(v.is_valid, v.errors.is_empty());
    }

    #[test]
    fn storage_metadata_clips_preview_to_200() {
        let mut e = full_entry();
        e.content = "x".repeat(500);
        e.refresh_preview();
        assert_eq!(e.preview.chars().count(), 203);
        let meta = e.to_storage_metadata();
        assert_eq!(meta.preview.as_deref().map(|p| p.chars().count()), Some(200));
        assert_eq!(meta.title.as_deref(), Some("Quiet morning"));
        assert_eq!(meta.created_at, Some(e.created_at));
    }

    #[test]
    fn from_storage_object_uses_metadata() {
        let e = full_entry();
        let head = ObjectHead {
            key: "users/user-1/1700000000000-abc123xyz.md".into(),
            content_type: "text/markdown".into(),
            metadata: e.to_storage_metadata().to_object_metadata(),
            size: e.content.len() as u64,
            last_modified: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
        };
        let back = Entry::from_storage_object(&head, "user-1");
        assert_eq!(back.id.as_deref(), Some("1700000000000-abc123xyz"));
        assert_eq!(back.user_id.as_deref(), Some("user-1"));
        assert_eq!(back.content, "");
        assert_eq!(back.to_summary(), e.to_summary());
    }

    #[test]
    fn from_storage_object_falls_back_to_last_modified() {
        let modified = Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap();
        let head = ObjectHead {
            key: "users/u/abc.md".into(),
            content_type: "text/markdown".into(),
            metadata: ObjectMetadata::new(),
            size: 0,
            last_modified: modified,
        };
        let e = Entry::from_storage_object(&head, "u");
        assert_eq!(e.id.as_deref(), Some("abc"));
        assert_eq!(e.title, "Untitled");
        assert_eq!(e.preview, "");
        assert_eq!(e.date, modified);
        assert_eq!(e.created_at, modified);
        assert_eq!(e.updated_at, modified);
    }

    #[test]
    fn from_storage_object_with_body_sets_content() {
        let e = full_entry();
        let object = StoredObject {
            head: ObjectHead {
                key: "users/user-1/1700000000000-abc123xyz.md".into(),
                content_type: "text/markdown".into(),
                metadata: e.to_storage_metadata().to_object_metadata(),
                size: e.content.len() as u64,
                last_modified: now(),
            },
            body: e.content.clone().into_bytes(),
        };
        let back =
            Entry::from_storage_object_with_body(&object, "user-1", "1700000000000-abc123xyz");
        assert_eq!(back, e);
    }

    #[test]
    fn fetched_entries_rebuild_long_previews_from_the_body() {
        let mut e = full_entry();
        e.content = "word ".repeat(100);
        e.refresh_preview();
        let object = StoredObject {
            head: ObjectHead {
                key: "users/user-1/1700000000000-abc123xyz.md".into(),
                content_type: "text/markdown".into(),
                metadata: e.to_storage_metadata().to_object_metadata(),
                size: e.content.len() as u64,
                last_modified: now(),
            },
            body: e.content.clone().into_bytes(),
        };

        let listed = Entry::from_storage_object(&object.head, "user-1");
        assert_eq!(listed.preview.chars().count(), 200);

        let fetched =
            Entry::from_storage_object_with_body(&object, "user-1", "1700000000000-abc123xyz");
        assert_eq!(fetched.preview, e.preview);
        assert!(fetched.preview.ends_with("..."));
    }

    #[test]
    fn formatted_and_relative_dates() {
        let e = full_entry();
        assert_eq!(e.formatted_date(), "August 15, 2025");
        let later = e.date + Duration::hours(2);
        assert_eq!(e.relative_time(&later), "2 hours ago");
    }
}
