//! crates/mindcare_core/src/ports.rs
//!
//! Defines the storage contract for the application's core logic.
//! The key/value port is the boundary of the hexagonal architecture: the core
//! and the repositories built on it never know whether records live in files,
//! in memory, or in a browser's local storage.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all storage port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Storage quota exceeded writing '{key}': {required} bytes needed, {limit} allowed")]
    QuotaExceeded {
        key: String,
        required: u64,
        limit: u64,
    },
    #[error("Record '{0}' was changed by another writer")]
    Conflict(String),
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
    #[error("Could not serialize record '{key}': {message}")]
    Serialization { key: String, message: String },
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Revisions and Snapshots
//=========================================================================================

/// Fingerprint of the bytes stored under a key, used for optimistic concurrency.
///
/// Identical contents always share a revision, so a writer whose snapshot still
/// matches the stored bytes can safely replace them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Revision(u64);

impl Revision {
    /// The revision of a key that holds no value.
    pub const ABSENT: Revision = Revision(0);

    pub fn of(contents: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        contents.hash(&mut hasher);
        // 0 is reserved for ABSENT.
        Revision(hasher.finish().max(1))
    }

    pub fn of_contents(contents: Option<&str>) -> Self {
        contents.map_or(Self::ABSENT, Self::of)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// The raw contents of a key together with the revision they were read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub contents: Option<String>,
    pub revision: Revision,
}

impl Snapshot {
    pub fn absent() -> Self {
        Self {
            contents: None,
            revision: Revision::ABSENT,
        }
    }

    pub fn present(contents: String) -> Self {
        let revision = Revision::of(&contents);
        Self {
            contents: Some(contents),
            revision,
        }
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable, synchronous key to string storage.
///
/// Every write replaces the previous value as a whole; readers never observe a
/// partially written value.
pub trait KeyValueStore: Send + Sync {
    /// Reads the current contents of `key`.
    fn read(&self, key: &str) -> PortResult<Snapshot>;

    /// Unconditionally replaces the contents of `key`.
    fn write(&self, key: &str, contents: &str) -> PortResult<Revision>;

    /// Replaces the contents of `key` only if it is still at `expected`.
    /// Fails with [`PortError::Conflict`] otherwise.
    fn write_if(&self, key: &str, expected: Revision, contents: &str) -> PortResult<Revision>;

    /// Clears `key`. Clearing an absent key succeeds.
    fn delete(&self, key: &str) -> PortResult<()>;
}
