mod entries;
mod input;

pub use entries::{EntryHandlers, Reply};
pub use input::EntryInput;
