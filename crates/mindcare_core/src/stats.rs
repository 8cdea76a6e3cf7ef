//! crates/mindcare_core/src/stats.rs
//!
//! Dashboard figures derived from the stored histories.

use crate::domain::{JournalEntry, MoodEntry};

/// Number of most recent mood entries the dashboard summarizes.
pub const MOOD_WINDOW: usize = 7;
/// Entries at the end of the window compared against the rest for the trend.
pub const TREND_WINDOW: usize = 3;
pub const RECENT_JOURNAL_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Steady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodSummary {
    /// Mean rating over the window, rounded half up. `None` with no entries.
    pub average: Option<u32>,
    pub trend: Trend,
    pub entries: usize,
}

fn last_n<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

fn mean_rating(entries: &[MoodEntry]) -> Option<f64> {
    if entries.is_empty() {
        return None;
    }
    let sum: u32 = entries.iter().map(|e| u32::from(e.rating.get())).sum();
    Some(f64::from(sum) / entries.len() as f64)
}

/// Summarizes the last [`MOOD_WINDOW`] entries of a chronological history.
pub fn mood_summary(history: &[MoodEntry]) -> MoodSummary {
    let window = last_n(history, MOOD_WINDOW);
    let Some(average) = mean_rating(window) else {
        return MoodSummary {
            average: None,
            trend: Trend::Steady,
            entries: 0,
        };
    };

    let split = window.len().saturating_sub(TREND_WINDOW);
    let (older, recent) = window.split_at(split);
    let recent_avg = mean_rating(recent).unwrap_or(average);
    let older_avg = mean_rating(older).unwrap_or(recent_avg);

    let trend = if recent_avg > older_avg {
        Trend::Up
    } else if recent_avg < older_avg {
        Trend::Down
    } else {
        Trend::Steady
    };

    MoodSummary {
        average: Some((average + 0.5).floor() as u32),
        trend,
        entries: window.len(),
    }
}

/// The last few journal entries of a chronological list, oldest first.
pub fn recent_journal_entries(entries: &[JournalEntry]) -> &[JournalEntry] {
    last_n(entries, RECENT_JOURNAL_COUNT)
}

/// Presentation order for list views: newest first.
pub fn most_recent_first<T: Clone>(items: &[T]) -> Vec<T> {
    items.iter().rev().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Mood, Rating};
    use crate::ids::EntryId;
    use chrono::{NaiveDate, Utc};

    fn moods(ratings: &[u8]) -> Vec<MoodEntry> {
        ratings
            .iter()
            .enumerate()
            .map(|(i, &r)| MoodEntry {
                id: EntryId::new(i as u64 + 1),
                mood: Mood::Neutral,
                rating: Rating::new(r).unwrap(),
                note: String::new(),
                date: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn empty_history_has_no_average() {
        let summary = mood_summary(&[]);
        assert_eq!(summary.average, None);
        assert_eq!(summary.trend, Trend::Steady);
    }

    #[test]
    fn average_rounds_half_up() {
        // 7 and 8 average to 7.5.
        assert_eq!(mood_summary(&moods(&[7, 8])).average, Some(8));
        assert_eq!(mood_summary(&moods(&[7, 7, 8])).average, Some(7));
    }

    #[test]
    fn only_the_last_week_counts() {
        let summary = mood_summary(&moods(&[1, 1, 1, 10, 10, 10, 10, 10, 10, 10]));
        assert_eq!(summary.entries, MOOD_WINDOW);
        assert_eq!(summary.average, Some(10));
        assert_eq!(summary.trend, Trend::Steady);
    }

    #[test]
    fn trend_compares_recent_against_older() {
        assert_eq!(mood_summary(&moods(&[3, 3, 3, 8, 8, 8])).trend, Trend::Up);
        assert_eq!(mood_summary(&moods(&[8, 8, 2, 2, 2])).trend, Trend::Down);
        // Three or fewer entries have nothing older to compare to.
        assert_eq!(mood_summary(&moods(&[2, 9])).trend, Trend::Steady);
    }

    #[test]
    fn recent_journal_takes_the_tail() {
        let entries: Vec<JournalEntry> = (1..=5)
            .map(|i| JournalEntry {
                id: EntryId::new(i),
                content: format!("day {i}"),
                date: NaiveDate::from_ymd_opt(2026, 10, i as u32).unwrap(),
            })
            .collect();
        let recent = recent_journal_entries(&entries);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].id, EntryId::new(3));
        assert_eq!(most_recent_first(recent)[0].id, EntryId::new(5));
    }
}
