mod delete_mode;
mod edit_mode;
mod live_mode;
mod read_mode;
mod write_mode;

use crate::api_client::ApiClient;
use crate::cli::Cli;
use crate::common::CliModeResult;
use crate::render::Renderer;
use anyhow::Result;
use quill_core::ClientConfig;

pub use delete_mode::delete_mode;
pub use edit_mode::edit_mode;
pub use live_mode::{LiveEntry, compose, live_mode};
pub use read_mode::read_mode;
pub use write_mode::{parse_date_arg, write_mode};

/// What every mode gets to work with.
pub struct CliContext<'a> {
    pub cli: &'a Cli,
    pub renderer: &'a Renderer,
    pub client: &'a ApiClient,
    pub config: &'a ClientConfig,
}

fn not_found(ctx: &CliContext<'_>, id: &str) {
    ctx.renderer
        .print_info(&format!("No entry found with id {id}."));
}

/// Gives each mode a turn; the first one that handles the invocation ends the run.
/// Writing a new entry is the fallback.
pub async fn run(ctx: &CliContext<'_>) -> Result<()> {
    if let CliModeResult::Finish = read_mode(ctx).await? {
        return Ok(());
    }
    if let CliModeResult::Finish = edit_mode(ctx).await? {
        return Ok(());
    }
    if let CliModeResult::Finish = delete_mode(ctx).await? {
        return Ok(());
    }
    if let CliModeResult::Finish = live_mode(ctx).await? {
        return Ok(());
    }
    write_mode(ctx).await?;
    Ok(())
}
