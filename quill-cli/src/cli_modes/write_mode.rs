use super::CliContext;
use crate::api_client::EntryDraft;
use crate::common::{CliModeResult, edit_buffer, resolve_editor};
use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use quill_core::entry::timestamps::parse_timestamp;

/// Creates an entry from inline text, or from an editor buffer when no text was given.
pub async fn write_mode(ctx: &CliContext<'_>) -> Result<CliModeResult> {
    let content = if !ctx.cli.text.is_empty() {
        ctx.cli.text.join(" ")
    } else {
        edit_buffer(resolve_editor(&ctx.config.editor), String::new()).await?
    };
    if content.trim().is_empty() {
        ctx.renderer
            .print_info("No entry to save, because no text was received.");
        return Ok(CliModeResult::Finish);
    }

    let draft = EntryDraft {
        title: ctx.cli.title.clone(),
        content,
        date: parse_date_arg(ctx.cli.date.as_deref())?,
    };
    let entry = ctx.client.create(&draft).await?;
    ctx.renderer.print_info("Added new entry");
    ctx.renderer.print_entry_line(&entry.to_summary());
    Ok(CliModeResult::Finish)
}

/// `--date` accepts `2025-08-15` or a full RFC 3339 timestamp.
pub fn parse_date_arg(input: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match input {
        None => Ok(None),
        Some(raw) => parse_timestamp(raw)
            .map(Some)
            .ok_or_else(|| anyhow!("invalid date '{raw}', expected YYYY-MM-DD or RFC 3339")),
    }
}
