pub mod api;
pub mod errors;
pub mod handlers;
pub mod http;
pub mod identity;
pub mod response;

pub use api::{Api, ApiOptions, ApiRequest};
pub use errors::ApiError;
pub use http::HttpServer;
pub use identity::{HeaderIdentityResolver, IdentityResolver, UserId};
