//! services/companion/src/repositories/journal.rs

use chrono::{Local, NaiveDate};
use mindcare_core::domain::JournalEntry;
use mindcare_core::ids::EntryId;
use mindcare_core::validation::require;
use tracing::info;

use super::{RepoResult, Repository};
use crate::records::JournalRecord;
use crate::store::{keys, RecordStore};

/// Journal entries, stored under `journalEntries`.
#[derive(Clone)]
pub struct JournalRepository {
    inner: Repository<JournalRecord>,
}

impl JournalRepository {
    pub fn new(store: RecordStore, write_retries: u32) -> Self {
        Self {
            inner: Repository::new(store, keys::JOURNAL_ENTRIES, "journal entry", write_retries),
        }
    }

    pub fn entries(&self) -> Vec<JournalEntry> {
        self.inner.load_all()
    }

    /// Writes a new entry dated `date`, or today when none is given. Blank
    /// content is rejected without touching storage.
    pub fn create(&self, content: &str, date: Option<NaiveDate>) -> RepoResult<Vec<JournalEntry>> {
        require("content", content)?;
        let entry = JournalEntry {
            id: EntryId::UNASSIGNED,
            content: content.to_string(),
            date: date.unwrap_or_else(|| Local::now().date_naive()),
        };
        let entries = self.inner.append(entry)?;
        info!(total = entries.len(), "Journal entry created");
        Ok(entries)
    }

    /// Replaces the content and date of entry `id`.
    pub fn update(
        &self,
        id: EntryId,
        content: &str,
        date: NaiveDate,
    ) -> RepoResult<Vec<JournalEntry>> {
        require("content", content)?;
        let entries = self.inner.replace(id, |entry| {
            entry.content = content.to_string();
            entry.date = date;
        })?;
        info!(%id, "Journal entry updated");
        Ok(entries)
    }

    pub fn delete(&self, id: EntryId) -> RepoResult<Vec<JournalEntry>> {
        let entries = self.inner.remove(id)?;
        info!(%id, "Journal entry deleted");
        Ok(entries)
    }
}
