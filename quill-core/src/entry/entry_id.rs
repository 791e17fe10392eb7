use chrono::Utc;
use rand::Rng;

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a new entry id: `{unix millis}-{9 random base36 chars}`.
///
/// Ids sort roughly by creation time and are safe to use as a single storage key segment.
pub fn generate_entry_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{millis}-{suffix}")
}

/// Returns `true` if `segment` can be used as one segment of a storage key.
///
/// Rejects empty values, path separators and leading dots so a key built from
/// user-controlled ids never leaves its user's prefix.
pub fn is_valid_key_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with('.')
        && !segment.contains(['/', '\\'])
        && !segment.chars().any(char::is_control)
}
