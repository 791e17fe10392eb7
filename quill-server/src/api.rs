//! Routing and request/response plumbing, independent of the transport.
//!
//! - `GET    /health`
//! - `GET    /entries`       list the caller's entries (no content)
//! - `POST   /entries`       create
//! - `GET    /entries/{id}`  fetch one entry
//! - `PUT    /entries/{id}`  replace title/content/date
//! - `DELETE /entries/{id}`
//! - `OPTIONS *`             CORS preflight
use crate::errors::ApiError;
use crate::handlers::{EntryHandlers, Reply};
use crate::identity::{HeaderIdentityResolver, IdentityResolver, UserId};
use crate::response::{ApiResponse, Responder};
use anyhow::{Context, Result};
use bytes::Bytes;
use hyper::header::HeaderValue;
use hyper::{HeaderMap, Method, StatusCode};
use quill_core::{Config, EntryStore};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

/// A fully read request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiOptions {
    pub cors_origin: String,
    pub max_body_bytes: usize,
}

impl From<&Config> for ApiOptions {
    fn from(config: &Config) -> Self {
        Self {
            cors_origin: config.cors_origin.clone(),
            max_body_bytes: config.max_body_bytes,
        }
    }
}

enum Route<'a> {
    Health,
    Entries,
    Entry(&'a str),
}

pub struct Api {
    handlers: EntryHandlers,
    identity: Arc<dyn IdentityResolver>,
    responder: Responder,
    max_body_bytes: usize,
}

impl Api {
    pub fn new(
        store: EntryStore,
        identity: Arc<dyn IdentityResolver>,
        identity_header: &str,
        options: ApiOptions,
    ) -> Result<Self> {
        let allow_origin = HeaderValue::from_str(&options.cors_origin)
            .with_context(|| format!("invalid cors origin '{}'", options.cors_origin))?;
        let allow_headers =
            HeaderValue::from_str(&format!("content-type, authorization, {identity_header}"))
                .context("invalid identity header")?;

        Ok(Self {
            handlers: EntryHandlers::new(store),
            identity,
            responder: Responder::new(allow_origin, allow_headers),
            max_body_bytes: options.max_body_bytes,
        })
    }

    /// Wires the API the way the server binary runs it: identity from the configured header.
    pub fn from_config(store: EntryStore, config: &Config) -> Result<Self> {
        let identity = HeaderIdentityResolver::new(&config.identity_header)?;
        Self::new(
            store,
            Arc::new(identity),
            &config.identity_header,
            ApiOptions::from(config),
        )
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    pub async fn handle(&self, req: ApiRequest) -> ApiResponse {
        let result = if req.method == Method::OPTIONS {
            Ok(None)
        } else {
            self.route(&req).await.map(Some)
        };

        let response = match result {
            Ok(None) => self.responder.preflight(),
            Ok(Some(Reply::Json(status, body))) => self.responder.json(status, &body),
            Ok(Some(Reply::NoContent)) => self.responder.empty(StatusCode::NO_CONTENT),
            Err(e) => self.error_response(&e),
        };
        debug!(
            method = %req.method,
            path = %req.path,
            status = response.status().as_u16(),
            "handled request"
        );
        response
    }

    pub fn error_response(&self, e: &ApiError) -> ApiResponse {
        if e.status().is_server_error() {
            error!(error = %e, "request failed");
        } else {
            debug!(error = %e, "request rejected");
        }
        self.responder.error(e)
    }

    async fn route(&self, req: &ApiRequest) -> Result<Reply, ApiError> {
        if req.body.len() > self.max_body_bytes {
            return Err(ApiError::bad_request("Request body too large"));
        }

        let handlers = &self.handlers;
        match (parse_route(&req.path)?, &req.method) {
            (Route::Health, &Method::GET) => {
                Ok(Reply::Json(StatusCode::OK, json!({ "status": "ok" })))
            }
            (Route::Entries, &Method::GET) => handlers.list(&self.user(req)?).await,
            (Route::Entries, &Method::POST) => handlers.create(&self.user(req)?, &req.body).await,
            (Route::Entry(id), &Method::GET) => {
                let user = self.user(req)?;
                let id = decode_id(id)?;
                handlers.get(&user, &id).await
            }
            (Route::Entry(id), &Method::PUT) => {
                let user = self.user(req)?;
                let id = decode_id(id)?;
                handlers.update(&user, &id, &req.body).await
            }
            (Route::Entry(id), &Method::DELETE) => {
                let user = self.user(req)?;
                let id = decode_id(id)?;
                handlers.delete(&user, &id).await
            }
            _ => Err(ApiError::MethodNotAllowed),
        }
    }

    fn user(&self, req: &ApiRequest) -> Result<UserId, ApiError> {
        self.identity.resolve(&req.headers)
    }
}

fn parse_route(path: &str) -> Result<Route<'_>, ApiError> {
    match path {
        "/health" => Ok(Route::Health),
        "/entries" => Ok(Route::Entries),
        _ => path
            .strip_prefix("/entries/")
            .map(Route::Entry)
            .ok_or_else(|| ApiError::NotFound("Not found".to_string())),
    }
}

fn decode_id(raw: &str) -> Result<String, ApiError> {
    urlencoding::decode(raw)
        .map(|id| id.into_owned())
        .map_err(|_| ApiError::bad_request("Invalid entry id"))
}
