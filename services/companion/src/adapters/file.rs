//! services/companion/src/adapters/file.rs
//!
//! A `KeyValueStore` keeping one JSON document per key under a data directory.
//!
//! Writes go to a uniquely named temporary file in the same directory which is
//! then renamed over the target, so a reader sees either the old document or
//! the new one, never a torn write.
//!
//! Every write holds an exclusive OS lock on the key's `.<key>.lock` file from
//! the revision check until the rename. The lock is taken through the file
//! system, so it also excludes other stores (and other processes) opened on the
//! same directory.

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;
use mindcare_core::ports::{KeyValueStore, PortError, PortResult, Revision, Snapshot};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{check_key, check_quota};

const EXTENSION: &str = "json";

#[derive(Debug)]
pub struct FileKeyValueStore {
    root: PathBuf,
    quota_bytes: Option<u64>,
}

/// An exclusive lock on one key, released when dropped.
struct KeyLock {
    file: File,
}

impl Drop for KeyLock {
    fn drop(&mut self) {
        // Closing the file releases it too.
        let _ = FileExt::unlock(&self.file);
    }
}

fn unavailable(action: &str, path: &Path, e: std::io::Error) -> PortError {
    PortError::Unavailable(format!("failed to {} {}: {}", action, path.display(), e))
}

impl FileKeyValueStore {
    /// Opens (creating if needed) the data directory at `root`.
    pub fn open(root: impl Into<PathBuf>, quota_bytes: Option<u64>) -> PortResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| unavailable("create", &root, e))?;
        debug!(path = %root.display(), "Opened record directory");
        Ok(Self { root, quota_bytes })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{EXTENSION}"))
    }

    /// Blocks until this handle holds the exclusive lock for `key`.
    fn lock(&self, key: &str) -> PortResult<KeyLock> {
        let path = self.root.join(format!(".{key}.lock"));
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| unavailable("open", &path, e))?;
        file.lock_exclusive()
            .map_err(|e| unavailable("lock", &path, e))?;
        Ok(KeyLock { file })
    }

    /// Bytes held by every key except `key`, counted as key length plus file size.
    fn usage_excluding(&self, key: &str) -> PortResult<u64> {
        let entries = fs::read_dir(&self.root).map_err(|e| unavailable("list", &self.root, e))?;
        let mut used = 0u64;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem == key {
                continue;
            }
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            used += stem.len() as u64 + size;
        }
        Ok(used)
    }

    fn read_unlocked(&self, key: &str) -> PortResult<Snapshot> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Snapshot::present(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Snapshot::absent()),
            Err(e) => Err(unavailable("read", &path, e)),
        }
    }

    fn write_unlocked(&self, key: &str, contents: &str) -> PortResult<Revision> {
        if self.quota_bytes.is_some() {
            check_quota(self.quota_bytes, self.usage_excluding(key)?, key, contents)?;
        }

        let target = self.path_for(key);
        let staging = self.root.join(format!(".{key}.{}.tmp", Uuid::new_v4()));
        if let Err(e) = fs::write(&staging, contents) {
            let _ = fs::remove_file(&staging);
            return Err(unavailable("write", &staging, e));
        }
        if let Err(e) = fs::rename(&staging, &target) {
            if let Err(cleanup) = fs::remove_file(&staging) {
                warn!(path = %staging.display(), error = %cleanup, "Could not remove staging file");
            }
            return Err(unavailable("replace", &target, e));
        }
        Ok(Revision::of(contents))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn read(&self, key: &str) -> PortResult<Snapshot> {
        check_key(key)?;
        self.read_unlocked(key)
    }

    fn write(&self, key: &str, contents: &str) -> PortResult<Revision> {
        check_key(key)?;
        let _lock = self.lock(key)?;
        self.write_unlocked(key, contents)
    }

    fn write_if(&self, key: &str, expected: Revision, contents: &str) -> PortResult<Revision> {
        check_key(key)?;
        let _lock = self.lock(key)?;
        if self.read_unlocked(key)?.revision != expected {
            return Err(PortError::Conflict(key.to_string()));
        }
        self.write_unlocked(key, contents)
    }

    fn delete(&self, key: &str) -> PortResult<()> {
        check_key(key)?;
        let _lock = self.lock(key)?;
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(unavailable("remove", &path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn values_survive_reopening_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileKeyValueStore::open(dir.path(), None).unwrap();
            store.write("journalEntries", "[{\"id\":1}]").unwrap();
        }
        let reopened = FileKeyValueStore::open(dir.path(), None).unwrap();
        assert_eq!(
            reopened.read("journalEntries").unwrap().contents.as_deref(),
            Some("[{\"id\":1}]")
        );
        assert!(dir.path().join("journalEntries.json").exists());
    }

    #[test]
    fn no_staging_files_are_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path(), None).unwrap();
        store.write("moodData", "[]").unwrap();
        store.write("moodData", "[1]").unwrap();

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec![".moodData.lock".to_string(), "moodData.json".to_string()]);
    }

    #[test]
    fn stale_conditional_write_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path(), None).unwrap();
        let before = store.read("communityPosts").unwrap().revision;
        store.write("communityPosts", "[]").unwrap();

        assert_matches!(
            store.write_if("communityPosts", before, "[1]"),
            Err(PortError::Conflict(_))
        );
        let current = store.read("communityPosts").unwrap().revision;
        assert!(store.write_if("communityPosts", current, "[1]").is_ok());
    }

    #[test]
    fn quota_counts_other_documents() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path(), Some(40)).unwrap();
        store.write("moodData", "[1,2,3,4,5,6,7,8]").unwrap();

        assert_matches!(
            store.write("journalEntries", "[1,2,3,4,5,6,7,8]"),
            Err(PortError::QuotaExceeded { .. })
        );
        assert!(!dir.path().join("journalEntries.json").exists());
    }

    #[test]
    fn conditional_writes_are_exclusive_across_stores() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_path_buf();
        FileKeyValueStore::open(&path, None)
            .unwrap()
            .write("counter", "0")
            .unwrap();

        // Each thread opens its own store on the directory, like a second tab.
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let store = FileKeyValueStore::open(&path, None).unwrap();
                    for _ in 0..50 {
                        loop {
                            let snapshot = store.read("counter").unwrap();
                            let n: u64 = snapshot.contents.unwrap().parse().unwrap();
                            match store.write_if("counter", snapshot.revision, &(n + 1).to_string()) {
                                Ok(_) => break,
                                Err(PortError::Conflict(_)) => continue,
                                Err(e) => panic!("unexpected error: {e}"),
                            }
                        }
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let store = FileKeyValueStore::open(&path, None).unwrap();
        assert_eq!(store.read("counter").unwrap().contents.as_deref(), Some("200"));
    }

    #[test]
    fn deleting_missing_key_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path(), None).unwrap();
        store.delete("isAuthenticated").unwrap();
    }

    #[test]
    fn keys_cannot_escape_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path(), None).unwrap();
        assert_matches!(store.write("../x", "1"), Err(PortError::InvalidKey(_)));
    }
}
