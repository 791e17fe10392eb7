//! Plain-text previews of markdown content.
//!
//! This is a display approximation, not a markdown parser: heading markers,
//! emphasis/strike/code delimiters and link syntax are stripped so list views
//! can show a readable excerpt.

use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_PREVIEW_LENGTH: usize = 200;
const ELLIPSIS: &str = "...";

static HEADING_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#+\s+").expect("valid regex"));
static FORMATTING: Lazy<Regex> = Lazy::new(|| Regex::new(r"[*_~`]").expect("valid regex"));
static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid regex"));
static NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").expect("valid regex"));

/// Strips markdown from `content` and cuts it to `max_length` characters.
///
/// When the plain text is longer than `max_length`, `"..."` is appended, so the
/// result is at most `max_length + 3` characters long.
///
/// ```
/// # use quill_core::entry::generate_preview;
/// let preview = generate_preview("# Day one\n\nA **good** [walk](https://example.com).", 200);
/// assert_eq!(preview, "Day one A good walk.");
/// ```
pub fn generate_preview(content: &str, max_length: usize) -> String {
    if content.is_empty() {
        return String::new();
    }

    let plain = HEADING_PREFIX.replace_all(content, "");
    let plain = FORMATTING.replace_all(&plain, "");
    let plain = LINK.replace_all(&plain, "$1");
    let plain = NEWLINES.replace_all(&plain, " ");
    let plain = plain.trim();

    truncate_chars(plain, max_length)
}

/// Cuts `text` to `max_length` characters, marking the cut with an ellipsis.
pub fn truncate_chars(text: &str, max_length: usize) -> String {
    match text.char_indices().nth(max_length) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// Cuts `text` to at most `max_length` characters without adding anything.
pub fn clip_chars(text: &str, max_length: usize) -> &str {
    match text.char_indices().nth(max_length) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}
