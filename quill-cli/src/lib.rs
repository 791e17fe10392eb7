pub mod api_client;
pub mod cli;
pub mod cli_modes;
mod common;
pub mod render;
pub mod session;

pub use api_client::{ApiClient, ClientError, EntryDraft};
pub use cli::Cli;
pub use cli_modes::{CliContext, LiveEntry};
pub use common::CliModeResult;
pub use render::{ColorMode, RenderOptions, Renderer};
pub use session::Session;
