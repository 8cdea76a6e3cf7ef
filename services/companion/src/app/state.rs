//! services/companion/src/app/state.rs
//!
//! Defines the application's shared state: configuration, the record store,
//! the session and one repository per entity family.

use std::sync::Arc;

use mindcare_core::domain::{JournalEntry, Session};
use mindcare_core::ports::KeyValueStore;
use mindcare_core::stats::{mood_summary, recent_journal_entries, MoodSummary};
use tracing::info;

use crate::adapters::FileKeyValueStore;
use crate::app::session::SessionContext;
use crate::config::Config;
use crate::error::AppError;
use crate::repositories::{
    AdminResourceRepository, AdminServiceRepository, CommunityRepository, CounselingRepository,
    JournalRepository, MoodRepository, ProfileRepository,
};
use crate::store::RecordStore;

//=========================================================================================
// AppState
//=========================================================================================

/// Everything a view needs, created once at start-up.
pub struct AppState {
    pub config: Arc<Config>,
    pub store: RecordStore,
    pub session: SessionContext,
    pub moods: MoodRepository,
    pub journal: JournalRepository,
    pub community: CommunityRepository,
    pub counseling: CounselingRepository,
    pub admin_resources: AdminResourceRepository,
    pub admin_services: AdminServiceRepository,
    pub profile: ProfileRepository,
}

impl AppState {
    /// Opens the file-backed record store in `config.data_dir`.
    pub fn open(config: Config) -> Result<Self, AppError> {
        let backend = FileKeyValueStore::open(&config.data_dir, config.quota_bytes)?;
        info!(path = %config.data_dir.display(), "Record store opened");
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Wires everything over an arbitrary storage backend.
    pub fn with_backend(config: Config, backend: Arc<dyn KeyValueStore>) -> Self {
        let store = RecordStore::new(backend);
        let retries = config.write_retries;
        Self {
            session: SessionContext::init(store.clone()),
            moods: MoodRepository::new(store.clone(), retries),
            journal: JournalRepository::new(store.clone(), retries),
            community: CommunityRepository::new(store.clone(), retries),
            counseling: CounselingRepository::new(store.clone(), retries),
            admin_resources: AdminResourceRepository::new(store.clone(), retries),
            admin_services: AdminServiceRepository::new(store.clone(), retries),
            profile: ProfileRepository::new(store.clone()),
            config: Arc::new(config),
            store,
        }
    }

    /// The figures shown on the dashboard.
    pub fn dashboard(&self) -> Dashboard {
        let moods = self.moods.history();
        let journal = self.journal.entries();
        Dashboard {
            session: self.session.current(),
            mood: mood_summary(&moods),
            mood_count: moods.len(),
            journal_count: journal.len(),
            recent_journal: recent_journal_entries(&journal).to_vec(),
        }
    }
}

//=========================================================================================
// Dashboard
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub session: Session,
    pub mood: MoodSummary,
    pub mood_count: usize,
    pub journal_count: usize,
    /// The latest journal entries, oldest first.
    pub recent_journal: Vec<JournalEntry>,
}
