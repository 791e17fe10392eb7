use crate::errors::ApiError;
use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{self, HeaderValue};
use hyper::{Response, StatusCode};
use serde_json::Value;

pub type ApiResponse = Response<Full<Bytes>>;

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const PREFLIGHT_MAX_AGE: &str = "86400";

/// Builds responses that all carry the same CORS headers.
#[derive(Debug, Clone)]
pub struct Responder {
    allow_origin: HeaderValue,
    allow_headers: HeaderValue,
}

impl Responder {
    pub fn new(allow_origin: HeaderValue, allow_headers: HeaderValue) -> Self {
        Self {
            allow_origin,
            allow_headers,
        }
    }

    pub fn json(&self, status: StatusCode, body: &Value) -> ApiResponse {
        let mut response = self.empty(status);
        *response.body_mut() = Full::new(Bytes::from(body.to_string()));
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response
    }

    pub fn error(&self, error: &ApiError) -> ApiResponse {
        self.json(error.status(), &error.to_body())
    }

    pub fn empty(&self, status: StatusCode) -> ApiResponse {
        let mut response = Response::new(Full::new(Bytes::new()));
        *response.status_mut() = status;
        response.headers_mut().insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            self.allow_origin.clone(),
        );
        response
    }

    pub fn preflight(&self) -> ApiResponse {
        let mut response = self.empty(StatusCode::NO_CONTENT);
        let headers = response.headers_mut();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            self.allow_headers.clone(),
        );
        headers.insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(PREFLIGHT_MAX_AGE),
        );
        response
    }
}
