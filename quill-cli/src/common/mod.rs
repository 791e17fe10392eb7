mod cli_mode;
mod editor_utils;

pub use cli_mode::CliModeResult;
pub use editor_utils::{edit_buffer, resolve_editor};
