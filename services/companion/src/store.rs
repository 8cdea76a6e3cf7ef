//! services/companion/src/store.rs
//!
//! The Record Store: a typed JSON layer over a `KeyValueStore` backend.
//!
//! Reads never fail from the caller's point of view. A missing key, a document
//! that is not valid JSON for the requested type, or an unreadable backend all
//! come back as `None` (the latter two are logged). Writes return a
//! `PortResult` so callers can tell the user their change was not saved.

use std::sync::Arc;

use mindcare_core::ports::{KeyValueStore, PortError, PortResult, Revision, Snapshot};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

/// The persisted record keys. These names are a durable contract: documents
/// written under them must load again after an upgrade.
pub mod keys {
    pub const IS_AUTHENTICATED: &str = "isAuthenticated";
    pub const USER_EMAIL: &str = "userEmail";
    pub const IS_ADMIN: &str = "isAdmin";
    pub const MOOD_DATA: &str = "moodData";
    pub const JOURNAL_ENTRIES: &str = "journalEntries";
    pub const COMMUNITY_POSTS: &str = "communityPosts";
    pub const COUNSELING_BOOKINGS: &str = "counselingBookings";
    pub const ADMIN_RESOURCES: &str = "adminResources";
    pub const ADMIN_SERVICES: &str = "adminServices";
    pub const STUDENT_DETAILS: &str = "studentDetails";

    pub const SESSION: [&str; 3] = [IS_AUTHENTICATED, USER_EMAIL, IS_ADMIN];
}

#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn KeyValueStore>,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Returns the value stored at `key`, or `None` if it is unset or unusable.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let snapshot = match self.backend.read(key) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(key, error = %e, "Could not read record; treating it as absent");
                return None;
            }
        };
        let contents = snapshot.contents?;
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Stored record is malformed; treating it as absent");
                None
            }
        }
    }

    /// Serializes `value` and replaces whatever is stored at `key`.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> PortResult<()> {
        let contents = encode(key, value)?;
        self.backend
            .write(key, &contents)
            .map(|_| debug!(key, bytes = contents.len(), "Saved record"))
            .map_err(|e| log_write_failure(key, e))
    }

    /// Stores `text` verbatim, without JSON quoting. Used for the session keys,
    /// which have always held bare strings such as `true`.
    pub fn set_text(&self, key: &str, text: &str) -> PortResult<()> {
        self.backend
            .write(key, text)
            .map(|_| debug!(key, bytes = text.len(), "Saved record"))
            .map_err(|e| log_write_failure(key, e))
    }

    pub fn remove(&self, key: &str) -> PortResult<()> {
        self.backend.delete(key).map_err(|e| log_write_failure(key, e))
    }

    /// The raw contents of `key` and the revision they were read at.
    pub fn snapshot(&self, key: &str) -> PortResult<Snapshot> {
        self.backend.read(key)
    }

    /// Writes `value` only if `key` is still at `expected`.
    ///
    /// Conflicts are returned without being logged as failures; the caller is
    /// expected to re-read and retry.
    pub fn compare_and_set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        expected: Revision,
        value: &T,
    ) -> PortResult<Revision> {
        let contents = encode(key, value)?;
        match self.backend.write_if(key, expected, &contents) {
            Ok(revision) => {
                debug!(key, bytes = contents.len(), "Saved record");
                Ok(revision)
            }
            Err(e @ PortError::Conflict(_)) => Err(e),
            Err(e) => Err(log_write_failure(key, e)),
        }
    }
}

fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> PortResult<String> {
    serde_json::to_string(value).map_err(|e| PortError::Serialization {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn log_write_failure(key: &str, e: PortError) -> PortError {
    error!(key, error = %e, "Could not save record");
    e
}
