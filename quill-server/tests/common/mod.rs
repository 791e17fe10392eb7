#![allow(dead_code)]

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::{Method, StatusCode};
use hyper::header::HeaderValue;
use quill_core::{Config, EntryStore, MemoryBlobStore};
use quill_server::response::ApiResponse;
use quill_server::{Api, ApiRequest};
use serde_json::Value;
use std::sync::Arc;

pub const USER_HEADER: &str = "x-authenticated-user";

/// Test helper to create an `Api` over an in-memory store.
///
/// This is the single source of truth for test configuration.
pub fn mk_api() -> Api {
    mk_api_with(Config::default())
}

pub fn mk_api_with(config: Config) -> Api {
    let store = EntryStore::new(Arc::new(MemoryBlobStore::new()));
    Api::from_config(store, &config).unwrap()
}

pub fn request(method: Method, path: &str, user: Option<&str>, body: Option<&str>) -> ApiRequest {
    let mut req = ApiRequest::new(method, path);
    if let Some(user) = user {
        req.headers
            .insert(USER_HEADER, HeaderValue::from_str(user).unwrap());
    }
    if let Some(body) = body {
        req.body = Bytes::from(body.to_string());
    }
    req
}

/// Status and parsed JSON body (`Value::Null` when the body is empty).
pub async fn send(api: &Api, req: ApiRequest) -> (StatusCode, Value) {
    let response = api.handle(req).await;
    let status = response.status();
    (status, body_json(response).await)
}

pub async fn body_json(response: ApiResponse) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}
