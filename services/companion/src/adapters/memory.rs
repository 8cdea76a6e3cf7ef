//! services/companion/src/adapters/memory.rs
//!
//! An in-process `KeyValueStore`, used by tests and by embedders that do not
//! need anything to survive a restart.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use mindcare_core::ports::{KeyValueStore, PortError, PortResult, Revision, Snapshot};

use super::{check_key, check_quota};

#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<u64>,
}

impl MemoryKeyValueStore {
    /// Creates an empty, unlimited store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that refuses writes beyond `quota_bytes`.
    pub fn with_quota(quota_bytes: u64) -> Self {
        Self {
            entries: Mutex::default(),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn lock(&self) -> PortResult<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| PortError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn put(
        &self,
        entries: &mut HashMap<String, String>,
        key: &str,
        contents: &str,
    ) -> PortResult<Revision> {
        let used: u64 = entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| (k.len() + v.len()) as u64)
            .sum();
        check_quota(self.quota_bytes, used, key, contents)?;
        entries.insert(key.to_string(), contents.to_string());
        Ok(Revision::of(contents))
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn read(&self, key: &str) -> PortResult<Snapshot> {
        check_key(key)?;
        let entries = self.lock()?;
        Ok(entries
            .get(key)
            .cloned()
            .map_or_else(Snapshot::absent, Snapshot::present))
    }

    fn write(&self, key: &str, contents: &str) -> PortResult<Revision> {
        check_key(key)?;
        let mut entries = self.lock()?;
        self.put(&mut entries, key, contents)
    }

    fn write_if(&self, key: &str, expected: Revision, contents: &str) -> PortResult<Revision> {
        check_key(key)?;
        let mut entries = self.lock()?;
        let current = Revision::of_contents(entries.get(key).map(String::as_str));
        if current != expected {
            return Err(PortError::Conflict(key.to_string()));
        }
        self.put(&mut entries, key, contents)
    }

    fn delete(&self, key: &str) -> PortResult<()> {
        check_key(key)?;
        self.lock()?.remove(key);
        Ok(())
    }
}
