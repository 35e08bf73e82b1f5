//! Shared key handling for storage backends.

use crate::traits::{StorageError, StorageResult};

/// Reject empty keys. Any other string is a valid key; backends that map keys onto
/// paths must encode them.
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }

    Ok(())
}

/// File name holding the value of `key`. Percent-encoding keeps every key a single
/// path component, so separators inside a key cannot escape the data directory.
#[cfg(feature = "storage-local")]
pub(crate) fn key_to_file_name(key: &str) -> String {
    format!("{}.json", urlencoding::encode(key))
}
