//! services/companion/src/repositories/mod.rs
//!
//! The generic repository every entity family is built on, and the
//! per-family repositories.
//!
//! A repository owns exactly one record key holding an ordered (oldest first)
//! JSON array. Every mutation is a read-modify-write of the whole array guarded
//! by the key's revision: if another writer saved in between, the mutation is
//! re-applied to the fresh contents instead of overwriting them.

pub mod admin;
pub mod community;
pub mod counseling;
pub mod journal;
pub mod mood;
pub mod profile;

pub use admin::{AdminResourceRepository, AdminServiceRepository};
pub use community::CommunityRepository;
pub use counseling::CounselingRepository;
pub use journal::JournalRepository;
pub use mood::MoodRepository;
pub use profile::ProfileRepository;

use std::marker::PhantomData;

use mindcare_core::domain::Entity;
use mindcare_core::ids::{self, EntryId};
use mindcare_core::ports::{PortError, Revision, Snapshot};
use mindcare_core::validation::ValidationError;
use serde_json::Value;
use tracing::{debug, warn};

use crate::records::Record;
use crate::store::RecordStore;

//=========================================================================================
// Errors
//=========================================================================================

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: EntryId },

    #[error("Could not save {key}: {source}")]
    Store {
        key: &'static str,
        #[source]
        source: PortError,
    },

    #[error("Could not save {key}: it was changed by another writer {attempts} times in a row")]
    Conflict { key: &'static str, attempts: u32 },
}

pub type RepoResult<T> = Result<T, RepoError>;

//=========================================================================================
// Document decoding
//=========================================================================================

/// Where each stored element sat, so that elements which failed the
/// load-boundary check can be written back between the same neighbors.
enum Slot {
    Valid(EntryId),
    Quarantined(Value),
}

struct Decoded<E> {
    items: Vec<E>,
    layout: Vec<Slot>,
    /// The document exists but is not an array at all.
    unreadable: bool,
}

fn decode<R: Record>(key: &str, contents: Option<&str>) -> Decoded<R::Entity> {
    let mut decoded = Decoded {
        items: Vec::new(),
        layout: Vec::new(),
        unreadable: false,
    };
    let Some(contents) = contents else {
        return decoded;
    };
    let elements = match serde_json::from_str::<Vec<Value>>(contents) {
        Ok(elements) => elements,
        Err(e) => {
            warn!(key, error = %e, "Stored collection is malformed; treating it as empty");
            decoded.unreadable = true;
            return decoded;
        }
    };

    for (index, element) in elements.into_iter().enumerate() {
        let entity = serde_json::from_value::<R>(element.clone())
            .map_err(|e| e.to_string())
            .and_then(|record| record.into_entity().map_err(|e| e.to_string()));
        match entity {
            Ok(entity) => {
                decoded.layout.push(Slot::Valid(entity.id()));
                decoded.items.push(entity);
            }
            Err(reason) => {
                warn!(key, index, %reason, "Skipping malformed record");
                decoded.layout.push(Slot::Quarantined(element));
            }
        }
    }
    decoded
}

/// Lays `items` out in their stored order with quarantined elements between
/// the same neighbors as before. Items removed since decoding leave no gap;
/// items added since go at the end.
fn encode<R: Record>(
    key: &str,
    items: &[R::Entity],
    layout: &[Slot],
) -> Result<Vec<Value>, PortError> {
    let to_value = |entity: &R::Entity| {
        serde_json::to_value(R::from_entity(entity)).map_err(|e| PortError::Serialization {
            key: key.to_string(),
            message: e.to_string(),
        })
    };

    let mut pending = items.iter().peekable();
    let mut elements = Vec::with_capacity(layout.len().max(items.len()));
    for slot in layout {
        match slot {
            Slot::Quarantined(element) => elements.push(element.clone()),
            Slot::Valid(id) => {
                if let Some(entity) = pending.next_if(|entity| entity.id() == *id) {
                    elements.push(to_value(entity)?);
                }
            }
        }
    }
    for entity in pending {
        elements.push(to_value(entity)?);
    }
    Ok(elements)
}

/// The side key an unreadable document is copied to before it is replaced.
/// Named after the revision, so retrying the same save copies it only once.
pub(crate) fn corrupt_copy_key(key: &str, revision: Revision) -> String {
    format!("{key}-corrupt-{revision}")
}

//=========================================================================================
// Generic repository
//=========================================================================================

pub struct Repository<R: Record> {
    store: RecordStore,
    key: &'static str,
    entity: &'static str,
    write_retries: u32,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key,
            entity: self.entity,
            write_retries: self.write_retries,
            _record: PhantomData,
        }
    }
}

impl<R: Record> Repository<R> {
    pub fn new(
        store: RecordStore,
        key: &'static str,
        entity: &'static str,
        write_retries: u32,
    ) -> Self {
        Self {
            store,
            key,
            entity,
            write_retries,
            _record: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Every valid entity under the key, oldest first. Never fails: an absent,
    /// unreadable or malformed document loads as an empty list. The next save
    /// copies an unreadable document to [`corrupt_copy_key`] before replacing it.
    pub fn load_all(&self) -> Vec<R::Entity> {
        match self.store.snapshot(self.key) {
            Ok(snapshot) => decode::<R>(self.key, snapshot.contents.as_deref()).items,
            Err(e) => {
                warn!(key = self.key, error = %e, "Could not read collection; treating it as empty");
                Vec::new()
            }
        }
    }

    pub fn find(&self, id: EntryId) -> Option<R::Entity> {
        self.load_all().into_iter().find(|e| e.id() == id)
    }

    /// Appends `entity`, giving it a fresh id when it has none or its id is
    /// already taken, and returns the whole collection.
    pub fn append(&self, entity: R::Entity) -> RepoResult<Vec<R::Entity>> {
        entity.validate()?;
        self.mutate(|items| {
            let mut entity = entity.clone();
            let taken = items.iter().any(|e| e.id() == entity.id());
            if !entity.id().is_assigned() || taken {
                let floor = items.iter().map(Entity::id).max();
                entity.set_id(ids::next_id(floor));
            }
            items.push(entity);
            Ok(())
        })
    }

    /// Applies `mutator` to the entity with `id`, re-validates it and returns the
    /// whole collection. The id itself cannot be changed by the mutator.
    pub fn replace<F>(&self, id: EntryId, mutator: F) -> RepoResult<Vec<R::Entity>>
    where
        F: Fn(&mut R::Entity),
    {
        self.try_replace(id, |entity| {
            mutator(entity);
            Ok(())
        })
    }

    /// Like [`Repository::replace`], for mutations that can refuse the change.
    /// Nothing is written when `mutator` fails.
    pub fn try_replace<F>(&self, id: EntryId, mutator: F) -> RepoResult<Vec<R::Entity>>
    where
        F: Fn(&mut R::Entity) -> Result<(), ValidationError>,
    {
        self.mutate(|items| {
            let entity = items
                .iter_mut()
                .find(|e| e.id() == id)
                .ok_or(RepoError::NotFound {
                    entity: self.entity,
                    id,
                })?;
            mutator(entity)?;
            entity.set_id(id);
            entity.validate()?;
            Ok(())
        })
    }

    /// Removes the entity with `id` and returns what is left.
    pub fn remove(&self, id: EntryId) -> RepoResult<Vec<R::Entity>> {
        self.mutate(|items| {
            let before = items.len();
            items.retain(|e| e.id() != id);
            if items.len() == before {
                return Err(RepoError::NotFound {
                    entity: self.entity,
                    id,
                });
            }
            Ok(())
        })
    }

    /// Read-modify-write under optimistic concurrency. `apply` may run more than
    /// once, each time against freshly loaded contents.
    fn mutate<F>(&self, apply: F) -> RepoResult<Vec<R::Entity>>
    where
        F: Fn(&mut Vec<R::Entity>) -> RepoResult<()>,
    {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let snapshot = self.store.snapshot(self.key).map_err(|source| RepoError::Store {
                key: self.key,
                source,
            })?;
            let Decoded {
                mut items,
                layout,
                unreadable,
            } = decode::<R>(self.key, snapshot.contents.as_deref());

            apply(&mut items)?;

            if unreadable {
                self.keep_unreadable(&snapshot)?;
            }
            let document =
                encode::<R>(self.key, &items, &layout).map_err(|source| RepoError::Store {
                    key: self.key,
                    source,
                })?;
            match self
                .store
                .compare_and_set(self.key, snapshot.revision, &document)
            {
                Ok(_) => {
                    debug!(key = self.key, len = items.len(), attempts, "Collection saved");
                    return Ok(items);
                }
                Err(PortError::Conflict(_)) if attempts <= self.write_retries => {
                    debug!(key = self.key, attempts, "Collection changed underneath; retrying");
                }
                Err(PortError::Conflict(_)) => {
                    warn!(key = self.key, attempts, "Giving up after repeated write conflicts");
                    return Err(RepoError::Conflict {
                        key: self.key,
                        attempts,
                    });
                }
                Err(source) => {
                    return Err(RepoError::Store {
                        key: self.key,
                        source,
                    })
                }
            }
        }
    }

    /// Copies a document that could not be read as a collection to a side key,
    /// so the save about to replace it does not lose it.
    fn keep_unreadable(&self, snapshot: &Snapshot) -> RepoResult<()> {
        let Some(contents) = snapshot.contents.as_deref() else {
            return Ok(());
        };
        let copy = corrupt_copy_key(self.key, snapshot.revision);
        self.store
            .set_text(&copy, contents)
            .map_err(|source| RepoError::Store {
                key: self.key,
                source,
            })?;
        warn!(key = self.key, copy = %copy, "Kept the unreadable collection before replacing it");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use mindcare_core::ports::{KeyValueStore, PortResult, Revision, Snapshot};

    use crate::adapters::MemoryKeyValueStore;
    use crate::store::RecordStore;

    pub fn memory_store() -> RecordStore {
        RecordStore::new(Arc::new(MemoryKeyValueStore::new()))
    }

    /// Simulates a second tab: right before each of the first `interruptions`
    /// conditional writes, `interloper` runs against the same backend.
    pub struct InterleavingStore<F> {
        pub inner: Arc<MemoryKeyValueStore>,
        pub interruptions: AtomicUsize,
        pub interloper: F,
    }

    impl<F> KeyValueStore for InterleavingStore<F>
    where
        F: Fn(&MemoryKeyValueStore) + Send + Sync,
    {
        fn read(&self, key: &str) -> PortResult<Snapshot> {
            self.inner.read(key)
        }

        fn write(&self, key: &str, contents: &str) -> PortResult<Revision> {
            self.inner.write(key, contents)
        }

        fn write_if(&self, key: &str, expected: Revision, contents: &str) -> PortResult<Revision> {
            let remaining = self.interruptions.load(Ordering::SeqCst);
            if remaining > 0 {
                self.interruptions.store(remaining - 1, Ordering::SeqCst);
                (self.interloper)(&self.inner);
            }
            self.inner.write_if(key, expected, contents)
        }

        fn delete(&self, key: &str) -> PortResult<()> {
            self.inner.delete(key)
        }
    }
}
