use super::theme::OneDark;
use chrono::{DateTime, Utc};
use quill_core::autosave::SaveStatus;
use quill_core::entry::{format_long_date, format_relative_time};
use quill_core::{Entry, EntrySummary};
use std::fmt::Write;
use termimad::{
    MadSkin,
    crossterm::style::{Color, Stylize},
};

#[derive(Clone)]
pub struct RenderOptions {
    pub date_format: String,
    pub use_color: bool,
    pub short_mode: bool,
}

pub struct Renderer {
    skin: MadSkin,
    opts: RenderOptions,
}

impl Renderer {
    pub fn new(config: Option<RenderOptions>) -> Self {
        Self {
            skin: OneDark::journal_skin(),
            opts: config.unwrap_or_else(|| RenderOptions {
                date_format: "%B %-d, %Y".to_string(),
                use_color: true,
                short_mode: false,
            }),
        }
    }

    pub fn use_color(&self) -> bool {
        self.opts.use_color
    }

    pub fn print_md(&self, md: &str) {
        if self.opts.use_color {
            self.skin.print_text(md);
        } else {
            println!("{}", md.trim_end());
        }
    }

    pub fn print_info(&self, message: &str) {
        let md = format!("|-|\n| {message} |\n|-|\n");
        if self.opts.use_color {
            self.skin.print_text(&md);
        } else {
            println!("{}", message);
        }
    }

    pub fn print_entry_line(&self, entry: &EntrySummary) {
        println!("{}", self.entry_line(entry, &Utc::now()));
    }

    /// One entry per line in short mode, headings with previews otherwise.
    pub fn print_entries(&self, entries: &[EntrySummary]) {
        let now = Utc::now();
        for (i, entry) in entries.iter().enumerate() {
            if self.opts.short_mode {
                println!("{}", self.entry_line(entry, &now));
                continue;
            }

            self.print_md(&self.summary_markdown(entry, &now));
            if i + 1 < entries.len() {
                println!();
            }
            self.print_md("---");
        }
    }

    pub fn print_entry(&self, entry: &Entry) {
        self.print_md(&self.entry_markdown(entry));
    }

    /// `August 15, 2025 (2 hours ago) - Title [id]`
    pub fn entry_line(&self, entry: &EntrySummary, now: &DateTime<Utc>) -> String {
        let mut date = self.format_date(&entry.date);
        let mut relative = format!("({})", format_relative_time(&entry.date, now));
        let mut title = entry.title.clone();
        let mut id = format!("[{}]", entry.id.as_deref().unwrap_or("-"));

        if self.opts.use_color {
            date = date.with(Color::Cyan).to_string();
            relative = relative.with(Color::Blue).to_string();
            title = title.with(Color::Yellow).to_string();
            id = id.with(Color::DarkGrey).to_string();
        }
        format!("{date} {relative} - {title} {id}")
    }

    fn summary_markdown(&self, entry: &EntrySummary, now: &DateTime<Utc>) -> String {
        let heading = format!("## {}: {}", self.format_date(&entry.date), entry.title.trim());
        let meta = format!(
            "*{}* `{}`",
            format_relative_time(&entry.date, now),
            entry.id.as_deref().unwrap_or("-")
        );
        if entry.preview.is_empty() {
            format!("{heading}\n{meta}\n")
        } else {
            format!("{heading}\n{meta}\n\n{}\n", entry.preview)
        }
    }

    pub fn entry_markdown(&self, entry: &Entry) -> String {
        let words = entry.word_count();
        format!(
            "# {}\n*{}* · {} word{}\n\n{}\n",
            entry.title.trim(),
            self.format_date(&entry.date),
            words,
            if words == 1 { "" } else { "s" },
            entry.content.trim_end()
        )
    }

    /// Formats with the configured pattern, falling back to `August 15, 2025` when the
    /// pattern is not a valid strftime string.
    fn format_date(&self, date: &DateTime<Utc>) -> String {
        let mut out = String::new();
        match write!(out, "{}", date.format(&self.opts.date_format)) {
            Ok(()) => out,
            Err(_) => format_long_date(date),
        }
    }
}

/// Short status marker for the live composer, e.g. `[saved]`.
pub fn status_line(status: SaveStatus, use_color: bool) -> String {
    let text = format!("[{status}]");
    if !use_color {
        return text;
    }
    let color = match status {
        SaveStatus::Saved => OneDark::GREEN,
        SaveStatus::Pending => OneDark::COMMENT,
        SaveStatus::Saving => OneDark::YELLOW,
        SaveStatus::Error => OneDark::RED,
    };
    text.with(color).to_string()
}
