mod auto_saver;
mod save_status;

pub use auto_saver::{AutoSaver, DEFAULT_AUTOSAVE_DELAY, SaveHandler};
pub use save_status::SaveStatus;
