use super::{CliContext, not_found};
use crate::common::CliModeResult;
use anyhow::Result;

pub async fn read_mode(ctx: &CliContext<'_>) -> Result<CliModeResult> {
    if ctx.cli.list {
        let entries = ctx.client.list().await?;
        if entries.is_empty() {
            ctx.renderer.print_info("No entries found.");
        } else {
            ctx.renderer.print_entries(&entries);
            ctx.renderer
                .print_info(&format!("{} entries found.", entries.len()));
        }
        return Ok(CliModeResult::Finish);
    }

    if let Some(id) = &ctx.cli.show {
        match ctx.client.get(id).await {
            Ok(entry) => ctx.renderer.print_entry(&entry),
            Err(e) if e.is_not_found() => not_found(ctx, id),
            Err(e) => return Err(e.into()),
        }
        return Ok(CliModeResult::Finish);
    }

    Ok(CliModeResult::NothingToDo)
}
