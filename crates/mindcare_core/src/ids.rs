//! crates/mindcare_core/src/ids.rs
//!
//! Identifier generation for persisted entities.
//!
//! Ids are milliseconds since the Unix epoch at creation time, which keeps them
//! numerically compatible with documents written by earlier versions of the app.
//! Two entities created within the same millisecond would collide, so every id is
//! also forced above the last id issued by this process and above a caller-supplied
//! floor (usually the largest id already present in the target list).

use chrono::Utc;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// The identifier of a persisted entity (mood entry, journal entry, post, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u64);

impl EntryId {
    /// Marker for an entity that has not been persisted yet.
    pub const UNASSIGNED: EntryId = EntryId(0);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub fn is_assigned(self) -> bool {
        self != Self::UNASSIGNED
    }
}

impl From<u64> for EntryId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues strictly increasing, creation-time derived ids.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Returns a fresh id greater than the current time in milliseconds (or equal to it),
    /// greater than every id this generator issued before, and greater than `floor`.
    pub fn next_after(&self, floor: Option<EntryId>) -> EntryId {
        self.next_at(now_millis(), floor)
    }

    fn next_at(&self, now: u64, floor: Option<EntryId>) -> EntryId {
        let floor = floor.map_or(0, EntryId::get);
        let mut previous = self.last.load(Ordering::Acquire);
        loop {
            let candidate = now
                .max(previous.saturating_add(1))
                .max(floor.saturating_add(1));
            match self.last.compare_exchange_weak(
                previous,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return EntryId(candidate),
                Err(actual) => previous = actual,
            }
        }
    }
}

static GENERATOR: IdGenerator = IdGenerator::new();

/// Process-wide id allocation. See [`IdGenerator::next_after`].
pub fn next_id(floor: Option<EntryId>) -> EntryId {
    GENERATOR.next_after(floor)
}

fn now_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_within_one_millisecond_stay_unique() {
        let generator = IdGenerator::new();
        let ids: Vec<EntryId> = (0..100).map(|_| generator.next_at(1_000, None)).collect();

        let unique: HashSet<_> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(ids[0], EntryId::new(1_000));
    }

    #[test]
    fn floor_pushes_id_past_existing_entries() {
        let generator = IdGenerator::new();
        let id = generator.next_at(500, Some(EntryId::new(9_000)));
        assert_eq!(id, EntryId::new(9_001));
    }

    #[test]
    fn ids_follow_the_clock_when_it_is_ahead() {
        let generator = IdGenerator::new();
        generator.next_at(100, None);
        assert_eq!(generator.next_at(5_000, None), EntryId::new(5_000));
    }

    #[test]
    fn process_generator_is_time_derived() {
        let before = now_millis();
        let id = next_id(None);
        assert!(id.get() >= before);
        assert!(id.is_assigned());
    }
}
