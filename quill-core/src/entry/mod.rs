mod entry;
mod entry_id;
mod format_utils;
mod preview;
pub mod timestamps;

pub use entry::{
    DEFAULT_TITLE, Entry, EntryChanges, EntryFields, EntrySummary, MAX_CONTENT_BYTES,
    MAX_TITLE_CHARS, Validation,
};
pub use entry_id::{generate_entry_id, is_valid_key_segment};
pub use format_utils::{format_long_date, format_relative_time};
pub use preview::{DEFAULT_PREVIEW_LENGTH, generate_preview};
