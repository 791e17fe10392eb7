use super::{CliContext, parse_date_arg};
use crate::api_client::{ApiClient, EntryDraft};
use crate::common::CliModeResult;
use crate::render::status_line;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quill_core::autosave::{AutoSaver, SaveHandler, SaveStatus};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::debug;

/// The entry being written in live mode. The first save creates it,
/// later saves update it in place.
pub struct LiveEntry {
    client: ApiClient,
    title: Option<String>,
    date: Option<DateTime<Utc>>,
    id: Mutex<Option<String>>,
}

impl LiveEntry {
    pub fn new(client: ApiClient, title: Option<String>, date: Option<DateTime<Utc>>) -> Self {
        Self {
            client,
            title,
            date,
            id: Mutex::new(None),
        }
    }

    pub async fn entry_id(&self) -> Option<String> {
        self.id.lock().await.clone()
    }
}

#[async_trait]
impl SaveHandler for LiveEntry {
    async fn save(&self, content: String) -> Result<()> {
        let mut id = self.id.lock().await;
        let draft = EntryDraft {
            title: self.title.clone(),
            content,
            date: None,
        };
        if let Some(existing) = id.clone() {
            self.client.update(&existing, &draft).await?;
            debug!(id = %existing, "live entry updated");
        } else {
            let entry = self
                .client
                .create(&EntryDraft {
                    date: self.date,
                    ..draft
                })
                .await?;
            debug!(id = ?entry.id, "live entry created");
            *id = entry.id;
        }
        Ok(())
    }
}

/// Feeds every line read from `input` to the saver as the document so far.
/// Blank documents are never handed over since the server refuses them.
pub async fn compose<R: AsyncBufRead + Unpin>(input: R, saver: &AutoSaver) -> Result<String> {
    let mut lines = input.lines();
    let mut document: Vec<String> = Vec::new();
    while let Some(line) = lines.next_line().await? {
        document.push(line);
        let content = document.join("\n");
        if !content.trim().is_empty() {
            saver.on_change(content);
        }
    }
    Ok(document.join("\n"))
}

/// Writes an entry from stdin, saving after each pause in typing.
pub async fn live_mode(ctx: &CliContext<'_>) -> Result<CliModeResult> {
    if !ctx.cli.live {
        return Ok(CliModeResult::NothingToDo);
    }

    let target = Arc::new(LiveEntry::new(
        ctx.client.clone(),
        ctx.cli.title.clone(),
        parse_date_arg(ctx.cli.date.as_deref())?,
    ));
    let saver = AutoSaver::with_handler(target.clone(), ctx.config.autosave_delay);
    let watcher = watch_status(saver.subscribe(), ctx.renderer.use_color());

    ctx.renderer
        .print_info("Writing live, saving as you type. Finish with Ctrl-D.");
    let document = compose(BufReader::new(tokio::io::stdin()), &saver).await?;

    saver.save_now().await;
    let status = saver.status();
    saver.shutdown();
    drop(saver);
    let _ = watcher.await;

    match target.entry_id().await {
        _ if document.trim().is_empty() => ctx
            .renderer
            .print_info("No entry to save, because no text was received."),
        Some(id) if status == SaveStatus::Saved => {
            ctx.renderer.print_info(&format!("Saved entry {id}"))
        }
        Some(id) => ctx
            .renderer
            .print_info(&format!("Entry {id} has unsaved changes ({status})")),
        None => anyhow::bail!("the entry could not be saved ({status})"),
    }
    Ok(CliModeResult::Finish)
}

/// Prints every status change to stderr until the saver goes away.
fn watch_status(mut rx: watch::Receiver<SaveStatus>, use_color: bool) -> JoinHandle<()> {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let status = *rx.borrow_and_update();
            eprintln!("{}", status_line(status, use_color));
        }
    })
}
