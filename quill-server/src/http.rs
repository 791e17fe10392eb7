use crate::api::{Api, ApiRequest};
use crate::errors::ApiError;
use crate::response::ApiResponse;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::Request;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Pause before accepting again after a failed accept, e.g. when out of file descriptors.
pub const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// HTTP/1 front of an [`Api`]: one task per connection.
pub struct HttpServer {
    api: Arc<Api>,
    bind_addr: SocketAddr,
}

impl HttpServer {
    pub fn new(api: Arc<Api>, bind_addr: SocketAddr) -> Self {
        Self { api, bind_addr }
    }

    /// Binds the configured address and serves until the listener fails.
    pub async fn run(self: Arc<Self>) -> io::Result<()> {
        let listener = TcpListener::bind(self.bind_addr).await?;
        self.serve(listener).await
    }

    /// Serves connections from an already bound listener.
    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> io::Result<()> {
        info!(addr = %listener.local_addr()?, "HTTP server listening");

        loop {
            let (stream, remote_addr) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(err) => {
                    accept_failed(&err).await;
                    continue;
                }
            };
            let io = TokioIo::new(stream);
            let server = self.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req| {
                    let server = server.clone();
                    async move { server.handle_request(req).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    warn!(addr = %remote_addr, error = %err, "Connection error");
                }
            });
        }
    }

    async fn handle_request(&self, req: Request<Incoming>) -> Result<ApiResponse, Infallible> {
        let (parts, body) = req.into_parts();
        debug!(method = %parts.method, path = %parts.uri.path(), "Incoming request");

        let body = match Limited::new(body, self.api.max_body_bytes()).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) => {
                let error = if err.is::<LengthLimitError>() {
                    ApiError::bad_request("Request body too large")
                } else {
                    ApiError::bad_request("Could not read request body")
                };
                return Ok(self.api.error_response(&error));
            }
        };

        let request = ApiRequest {
            method: parts.method,
            path: parts.uri.path().to_string(),
            headers: parts.headers,
            body,
        };
        Ok(self.api.handle(request).await)
    }
}

async fn accept_failed(err: &io::Error) {
    warn!(error = %err, "Failed to accept connection");
    tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
}
