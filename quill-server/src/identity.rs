//! Resolving the caller's user id.
//!
//! Tokens are verified by the identity gateway in front of the server; by the
//! time a request arrives here the gateway has put the verified user id in a
//! header. The server trusts that header and never looks at tokens itself.
use crate::errors::ApiError;
use anyhow::{Context, Result};
use hyper::HeaderMap;
use hyper::header::HeaderName;
use std::fmt;

/// Opaque, non-empty identifier of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Result<UserId, ApiError>;
}

/// Reads the user id from a single trusted header.
#[derive(Debug, Clone)]
pub struct HeaderIdentityResolver {
    header: HeaderName,
}

impl HeaderIdentityResolver {
    pub fn new(header: &str) -> Result<Self> {
        let header = HeaderName::from_bytes(header.as_bytes())
            .with_context(|| format!("invalid identity header name '{header}'"))?;
        Ok(Self { header })
    }

    pub fn header(&self) -> &HeaderName {
        &self.header
    }
}

impl IdentityResolver for HeaderIdentityResolver {
    fn resolve(&self, headers: &HeaderMap) -> Result<UserId, ApiError> {
        headers
            .get(&self.header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|user| !user.is_empty())
            .map(|user| UserId(user.to_string()))
            .ok_or(ApiError::Unauthorized)
    }
}
