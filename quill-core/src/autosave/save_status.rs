use strum_macros::{AsRefStr, Display, EnumString};

/// Where the auto-saver stands with respect to the latest edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SaveStatus {
    /// The latest content is stored.
    #[default]
    Saved,
    /// An edit is waiting for the debounce timer.
    Pending,
    Saving,
    /// The last save failed. The edit is not retried until the content changes again.
    Error,
}
