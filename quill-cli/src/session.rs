//! An explicit, closeable connection context for the entries API.
use crate::api_client::ClientError;
use quill_core::ClientConfig;
use quill_core::config::DEFAULT_IDENTITY_HEADER;
use reqwest::{Client, Method, RequestBuilder};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Where to send requests and who to send them as.
///
/// Built from config with [`Session::open`] and handed to the API client;
/// after [`Session::close`] every request fails with [`ClientError::SessionClosed`].
#[derive(Debug)]
pub struct Session {
    api_url: String,
    user: Option<String>,
    token: Option<String>,
    identity_header: String,
    http: Client,
    open: AtomicBool,
}

impl Session {
    pub fn open(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::open_with_header(config, DEFAULT_IDENTITY_HEADER)
    }

    pub fn open_with_header(
        config: &ClientConfig,
        identity_header: &str,
    ) -> Result<Self, ClientError> {
        let http = Client::builder().build()?;
        debug!(api_url = %config.api_url, user = ?config.user, "session opened");
        Ok(Self {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            user: config.user.clone(),
            token: config.token.clone(),
            identity_header: identity_header.to_string(),
            http,
            open: AtomicBool::new(true),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn close(&self) {
        if self.open.swap(false, Ordering::SeqCst) {
            debug!(api_url = %self.api_url, "session closed");
        }
    }

    /// Starts a request to `{api_url}{path}` carrying the session's credentials.
    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder, ClientError> {
        if !self.is_open() {
            return Err(ClientError::SessionClosed);
        }
        let mut builder = self.http.request(method, format!("{}{path}", self.api_url));
        if let Some(user) = &self.user {
            builder = builder.header(self.identity_header.as_str(), user.as_str());
        }
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }
}
