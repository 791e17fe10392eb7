use super::{CliContext, not_found, parse_date_arg};
use crate::api_client::EntryDraft;
use crate::common::{CliModeResult, edit_buffer, resolve_editor};
use anyhow::Result;

/// Opens an existing entry in the editor and saves what comes back.
/// The title is kept unless `--title` is given.
pub async fn edit_mode(ctx: &CliContext<'_>) -> Result<CliModeResult> {
    let Some(id) = &ctx.cli.edit else {
        return Ok(CliModeResult::NothingToDo);
    };

    let entry = match ctx.client.get(id).await {
        Ok(entry) => entry,
        Err(e) if e.is_not_found() => {
            not_found(ctx, id);
            return Ok(CliModeResult::Finish);
        }
        Err(e) => return Err(e.into()),
    };

    let editor = resolve_editor(&ctx.config.editor);
    let content = edit_buffer(editor, entry.content.clone()).await?;
    if content == entry.content && ctx.cli.title.is_none() && ctx.cli.date.is_none() {
        ctx.renderer.print_info("No changes to save.");
        return Ok(CliModeResult::Finish);
    }
    if content.trim().is_empty() {
        ctx.renderer.print_info(&format!(
            "Not saved: the entry would be empty. Use `quill --delete {id}` to remove it."
        ));
        return Ok(CliModeResult::Finish);
    }

    let draft = EntryDraft {
        title: ctx.cli.title.clone().or(Some(entry.title)),
        content,
        date: parse_date_arg(ctx.cli.date.as_deref())?,
    };
    let updated = ctx.client.update(id, &draft).await?;
    ctx.renderer.print_info("Updated entry");
    ctx.renderer.print_entry_line(&updated.to_summary());
    Ok(CliModeResult::Finish)
}
