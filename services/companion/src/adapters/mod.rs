//! services/companion/src/adapters/mod.rs
//!
//! Concrete implementations of the `KeyValueStore` port.

pub mod file;
pub mod memory;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;

use mindcare_core::ports::{PortError, PortResult};

/// Keys become file names, so they are restricted to ASCII letters, digits, `_` and `-`.
pub(crate) fn check_key(key: &str) -> PortResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(PortError::InvalidKey(key.to_string()))
    }
}

/// Fails with `QuotaExceeded` when `used` bytes plus the new entry would exceed `limit`.
pub(crate) fn check_quota(
    limit: Option<u64>,
    used: u64,
    key: &str,
    contents: &str,
) -> PortResult<()> {
    let Some(limit) = limit else {
        return Ok(());
    };
    let required = used + (key.len() + contents.len()) as u64;
    if required > limit {
        Err(PortError::QuotaExceeded {
            key: key.to_string(),
            required,
            limit,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn record_keys_are_accepted() {
        for key in ["moodData", "journalEntries", "isAuthenticated", "admin-services_2"] {
            assert!(check_key(key).is_ok(), "{key}");
        }
    }

    #[test]
    fn path_like_keys_are_rejected() {
        for key in ["", "../etc", "a/b", "notes.json", "with space"] {
            assert_matches!(check_key(key), Err(PortError::InvalidKey(_)), "{key}");
        }
    }

    #[test]
    fn quota_counts_key_and_contents() {
        assert!(check_quota(Some(10), 0, "k", "123456789").is_ok());
        assert_matches!(
            check_quota(Some(10), 1, "k", "123456789"),
            Err(PortError::QuotaExceeded { required: 11, limit: 10, .. })
        );
        assert!(check_quota(None, u64::MAX / 2, "k", "v").is_ok());
    }
}
