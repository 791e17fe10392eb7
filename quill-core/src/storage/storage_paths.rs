use crate::entry::is_valid_key_segment;
use crate::errors::StorageError;

pub const USERS_PREFIX: &str = "users";
pub const ENTRY_EXTENSION: &str = ".md";

/// `users/{user_id}/`
pub fn user_prefix(user_id: &str) -> Result<String, StorageError> {
    check_segment("user id", user_id)?;
    Ok(format!("{USERS_PREFIX}/{user_id}/"))
}

/// `users/{user_id}/{entry_id}.md`
pub fn entry_key(user_id: &str, entry_id: &str) -> Result<String, StorageError> {
    check_segment("entry id", entry_id)?;
    Ok(format!("{}{entry_id}{ENTRY_EXTENSION}", user_prefix(user_id)?))
}

/// Extracts the entry id from a key: the last segment without its `.md` extension.
pub fn entry_id_from_key(key: &str) -> &str {
    let file_name = key.rsplit('/').next().unwrap_or(key);
    file_name.strip_suffix(ENTRY_EXTENSION).unwrap_or(file_name)
}

fn check_segment(what: &str, value: &str) -> Result<(), StorageError> {
    if is_valid_key_segment(value) {
        Ok(())
    } else {
        Err(StorageError::InvalidEntry(format!("unusable {what} '{value}'")))
    }
}
