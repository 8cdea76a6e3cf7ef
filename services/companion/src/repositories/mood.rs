//! services/companion/src/repositories/mood.rs

use chrono::Utc;
use mindcare_core::domain::{MoodEntry, NewMoodEntry};
use mindcare_core::ids::EntryId;
use tracing::info;

use super::{RepoResult, Repository};
use crate::records::MoodRecord;
use crate::store::{keys, RecordStore};

/// Mood check-ins, stored under `moodData`. Entries are never edited.
#[derive(Clone)]
pub struct MoodRepository {
    inner: Repository<MoodRecord>,
}

impl MoodRepository {
    pub fn new(store: RecordStore, write_retries: u32) -> Self {
        Self {
            inner: Repository::new(store, keys::MOOD_DATA, "mood entry", write_retries),
        }
    }

    /// All check-ins, oldest first.
    pub fn history(&self) -> Vec<MoodEntry> {
        self.inner.load_all()
    }

    /// Stamps the submitted form with the current instant, appends it and
    /// returns the updated history.
    pub fn record(&self, form: NewMoodEntry) -> RepoResult<Vec<MoodEntry>> {
        let entry = MoodEntry {
            id: EntryId::UNASSIGNED,
            mood: form.mood,
            rating: form.rating,
            note: form.note,
            date: Utc::now(),
        };
        let mood = entry.mood.as_str();
        let rating = entry.rating.get();
        let history = self.inner.append(entry)?;
        info!(mood, rating, total = history.len(), "Mood recorded");
        Ok(history)
    }
}
