use crate::session::Session;
use chrono::{DateTime, Utc};
use quill_core::entry::timestamps::iso8601;
use quill_core::{Entry, EntrySummary};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("session closed")]
    SessionClosed,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status.
    #[error("{message} ({status})")]
    Api {
        status: StatusCode,
        message: String,
        errors: Vec<String>,
    },
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// What the client sends on create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntryDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "iso8601::option::serialize"
    )]
    pub date: Option<DateTime<Utc>>,
}

impl EntryDraft {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    errors: Vec<String>,
}

/// Typed access to the `/entries` API through a [`Session`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn create(&self, draft: &EntryDraft) -> Result<Entry, ClientError> {
        let request = self.session.request(Method::POST, "/entries")?.json(draft);
        Ok(send(request).await?.json().await?)
    }

    pub async fn list(&self) -> Result<Vec<EntrySummary>, ClientError> {
        let request = self.session.request(Method::GET, "/entries")?;
        Ok(send(request).await?.json().await?)
    }

    pub async fn get(&self, id: &str) -> Result<Entry, ClientError> {
        let request = self.session.request(Method::GET, &entry_path(id))?;
        Ok(send(request).await?.json().await?)
    }

    pub async fn update(&self, id: &str, draft: &EntryDraft) -> Result<Entry, ClientError> {
        let request = self.session.request(Method::PUT, &entry_path(id))?.json(draft);
        Ok(send(request).await?.json().await?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let request = self.session.request(Method::DELETE, &entry_path(id))?;
        send(request).await?;
        Ok(())
    }
}

fn entry_path(id: &str) -> String {
    format!("/entries/{}", urlencoding::encode(id))
}

async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
    let response = request.send().await?;
    let status = response.status();
    debug!(status = status.as_u16(), url = %response.url(), "api response");
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let (message, errors) = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => (body.message, body.errors),
        Err(_) => (
            status.canonical_reason().unwrap_or("request failed").to_string(),
            Vec::new(),
        ),
    };
    Err(ClientError::Api {
        status,
        message,
        errors,
    })
}
