//! services/companion/src/repositories/profile.rs

use mindcare_core::domain::Profile;
use tracing::info;

use super::{RepoError, RepoResult};
use crate::records::ProfileRecord;
use crate::store::{keys, RecordStore};

/// The single student profile document under `studentDetails`.
#[derive(Clone)]
pub struct ProfileRepository {
    store: RecordStore,
}

impl ProfileRepository {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// The saved profile, or an all-blank one when nothing usable is stored.
    pub fn load(&self) -> Profile {
        self.store
            .get::<ProfileRecord>(keys::STUDENT_DETAILS)
            .map(Profile::from)
            .unwrap_or_default()
    }

    /// Overwrites the stored profile with `profile`.
    pub fn save(&self, profile: &Profile) -> RepoResult<()> {
        self.store
            .set(keys::STUDENT_DETAILS, &ProfileRecord::from(profile))
            .map_err(|source| RepoError::Store {
                key: keys::STUDENT_DETAILS,
                source,
            })?;
        info!("Profile saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryKeyValueStore;
    use mindcare_core::ports::KeyValueStore;
    use std::sync::Arc;

    #[test]
    fn missing_profile_loads_blank() {
        let repo = ProfileRepository::new(crate::repositories::test_support::memory_store());
        assert_eq!(repo.load(), Profile::default());
    }

    #[test]
    fn save_overwrites_wholesale() {
        let repo = ProfileRepository::new(crate::repositories::test_support::memory_store());
        let mut profile = Profile {
            name: "Sam Lee".to_string(),
            email: "sam@uni.edu".to_string(),
            phone: "555-0100".to_string(),
            age: "20".to_string(),
            gender: "Prefer not to say".to_string(),
        };
        repo.save(&profile).unwrap();
        profile.phone.clear();
        repo.save(&profile).unwrap();
        assert_eq!(repo.load(), profile);
    }

    #[test]
    fn partial_document_fills_in_blanks() {
        let backend = Arc::new(MemoryKeyValueStore::new());
        backend
            .write(keys::STUDENT_DETAILS, r#"{"name":"Sam"}"#)
            .unwrap();
        let repo = ProfileRepository::new(RecordStore::new(backend));
        let profile = repo.load();
        assert_eq!(profile.name, "Sam");
        assert_eq!(profile.email, "");
    }

    #[test]
    fn corrupt_profile_loads_blank() {
        let backend = Arc::new(MemoryKeyValueStore::new());
        backend.write(keys::STUDENT_DETAILS, "{{{").unwrap();
        let repo = ProfileRepository::new(RecordStore::new(backend));
        assert_eq!(repo.load(), Profile::default());
    }
}
