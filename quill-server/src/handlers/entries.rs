//! The five entry operations. Each one runs for an already-resolved user and
//! performs at most one read/modify/write sequence against the store.
use super::input::EntryInput;
use crate::errors::ApiError;
use crate::identity::UserId;
use hyper::StatusCode;
use quill_core::entry::generate_entry_id;
use quill_core::{Entry, EntryChanges, EntryFields, EntryStore};
use serde_json::Value;
use tracing::info;

#[derive(Debug)]
pub enum Reply {
    Json(StatusCode, Value),
    NoContent,
}

#[derive(Clone)]
pub struct EntryHandlers {
    store: EntryStore,
}

impl EntryHandlers {
    pub fn new(store: EntryStore) -> Self {
        Self { store }
    }

    /// `POST /entries`
    pub async fn create(&self, user: &UserId, body: &[u8]) -> Result<Reply, ApiError> {
        let input = EntryInput::parse(body)?;
        let mut entry = Entry::new(EntryFields {
            id: Some(generate_entry_id()),
            user_id: Some(user.to_string()),
            title: input.title,
            content: Some(input.content),
            date: input.date,
            ..Default::default()
        });
        entry.refresh_preview();

        self.check(&entry)?;
        self.store.save(&entry).await?;
        info!(user = %user, id = entry.id.as_deref().unwrap_or_default(), "created entry");
        Ok(Reply::Json(StatusCode::CREATED, entry.to_client_json()))
    }

    /// `GET /entries`
    pub async fn list(&self, user: &UserId) -> Result<Reply, ApiError> {
        let summaries = self.store.list(user.as_str()).await?;
        let body = serde_json::to_value(&summaries).map_err(|e| ApiError::Internal(e.to_string()))?;
        Ok(Reply::Json(StatusCode::OK, body))
    }

    /// `GET /entries/{id}`
    pub async fn get(&self, user: &UserId, id: &str) -> Result<Reply, ApiError> {
        let id = require_id(id)?;
        let entry = self.store.get(user.as_str(), id).await?;
        Ok(Reply::Json(StatusCode::OK, entry.to_client_json()))
    }

    /// `PUT /entries/{id}`: replaces title and content; a missing date keeps the stored one.
    pub async fn update(&self, user: &UserId, id: &str, body: &[u8]) -> Result<Reply, ApiError> {
        let id = require_id(id)?;
        let input = EntryInput::parse(body)?;

        let mut entry = self.store.get(user.as_str(), id).await?;
        entry.apply(EntryChanges {
            title: input.title,
            content: input.content,
            date: input.date,
        });

        self.check(&entry)?;
        self.store.save(&entry).await?;
        info!(user = %user, id, "updated entry");
        Ok(Reply::Json(StatusCode::OK, entry.to_client_json()))
    }

    /// `DELETE /entries/{id}`
    pub async fn delete(&self, user: &UserId, id: &str) -> Result<Reply, ApiError> {
        let id = require_id(id)?;
        if !self.store.exists(user.as_str(), id).await? {
            return Err(ApiError::entry_not_found());
        }
        self.store.delete(user.as_str(), id).await?;
        info!(user = %user, id, "deleted entry");
        Ok(Reply::NoContent)
    }

    fn check(&self, entry: &Entry) -> Result<(), ApiError> {
        let validation = entry.validate();
        if validation.is_valid {
            Ok(())
        } else {
            Err(ApiError::validation_failed(validation.errors))
        }
    }
}

fn require_id(id: &str) -> Result<&str, ApiError> {
    if id.is_empty() {
        Err(ApiError::bad_request("Entry id is required"))
    } else {
        Ok(id)
    }
}
