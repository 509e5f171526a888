//! Bounded, insertion-ordered store of past analyses.
//!
//! Fixed capacity, most-recent-first: the newest entry is always at index 0
//! and the oldest entry is physically removed once capacity is exceeded.
//! Read paths derive the label distribution, the chronological score trend,
//! and a day-bucketed activity heatmap over a fixed trailing window. Day
//! bucketing uses the UTC calendar date so derived views are
//! timezone-agnostic and deterministic.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{HistoryEntry, HistorySummary, TrustLabel};

/// Maximum number of retained entries.
pub const HISTORY_CAPACITY: usize = 10;

/// Trailing window of the activity heatmap, in days.
pub const HEATMAP_WINDOW_DAYS: i64 = 35;

/// One day of activity in the heatmap window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    /// UTC calendar date
    pub date: NaiveDate,
    /// Total analyses completed that day
    pub total: usize,
    /// Analyses labeled as the escalation case (Low trust) that day
    pub escalations: usize,
}

/// Fixed-capacity, most-recent-first history store.
///
/// Exclusively owns its entry list; entries are never mutated after
/// insertion.
#[derive(Debug, Default)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed analysis.
    ///
    /// The entry lands at index 0; once the store would exceed
    /// [`HISTORY_CAPACITY`], the oldest entry is removed for good.
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index` (0 = most recent).
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Summaries of all retained entries, most recent first.
    pub fn summaries(&self) -> Vec<HistorySummary> {
        self.entries.iter().map(HistoryEntry::summary).collect()
    }

    /// Count of retained entries per trust label.
    pub fn label_distribution(&self) -> [(TrustLabel, usize); 3] {
        let mut high = 0;
        let mut medium = 0;
        let mut low = 0;
        for entry in &self.entries {
            match entry.full_result.label {
                TrustLabel::High => high += 1,
                TrustLabel::Medium => medium += 1,
                TrustLabel::Low => low += 1,
            }
        }
        [
            (TrustLabel::High, high),
            (TrustLabel::Medium, medium),
            (TrustLabel::Low, low),
        ]
    }

    /// Scores in chronological order (oldest first), the inverse of storage
    /// order. Feeds the trend chart.
    pub fn score_trend(&self) -> Vec<u8> {
        self.entries
            .iter()
            .rev()
            .map(|e| e.full_result.score)
            .collect()
    }

    /// Day-bucketed activity over the trailing [`HEATMAP_WINDOW_DAYS`]
    /// window ending at `now`, oldest day first. Days without activity are
    /// included with zero counts.
    pub fn activity_heatmap(&self, now: DateTime<Utc>) -> Vec<DayBucket> {
        let today = now.date_naive();
        let window_start = today - Duration::days(HEATMAP_WINDOW_DAYS - 1);

        (0..HEATMAP_WINDOW_DAYS)
            .map(|offset| {
                let date = window_start + Duration::days(offset);
                let mut total = 0;
                let mut escalations = 0;
                for entry in &self.entries {
                    if entry.full_result.timestamp.date_naive() == date {
                        total += 1;
                        if entry.full_result.label.is_escalation() {
                            escalations += 1;
                        }
                    }
                }
                DayBucket {
                    date,
                    total,
                    escalations,
                }
            })
            .collect()
    }
}
