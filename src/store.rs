//! Session persistence.

use std::path::Path;

use crate::error::StoreError;
use crate::record::SessionRecord;

/// Writes a session record to `path` as pretty-printed JSON.
///
/// On failure the in-memory session is untouched; the caller decides whether
/// to retry with another path.
pub fn save_session(record: &SessionRecord, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(path, json)?;
    tracing::info!(
        session_id = %record.session_id,
        rounds = record.total_hands_dealt,
        path = %path.display(),
        "session saved"
    );
    Ok(())
}

/// Reads a session record back from a JSON file written by [`save_session`].
pub fn load_session(path: impl AsRef<Path>) -> Result<SessionRecord, StoreError> {
    let text = std::fs::read_to_string(path)?;
    let record = serde_json::from_str(&text)?;
    Ok(record)
}
