use super::{CliContext, not_found};
use crate::common::CliModeResult;
use anyhow::Result;

pub async fn delete_mode(ctx: &CliContext<'_>) -> Result<CliModeResult> {
    let Some(id) = &ctx.cli.delete else {
        return Ok(CliModeResult::NothingToDo);
    };
    match ctx.client.delete(id).await {
        Ok(()) => ctx.renderer.print_info(&format!("Deleted entry {id}")),
        Err(e) if e.is_not_found() => not_found(ctx, id),
        Err(e) => return Err(e.into()),
    }
    Ok(CliModeResult::Finish)
}
