use chrono::{Local, TimeZone};

use crate::domain::aggregation::{
    compute_totals, format_number, ratio_percent, DECIMAL_PLACES, DETAIL_WEIGHT_PLACES,
    WEIGHT_TOTAL_PLACES,
};
use crate::domain::entities::entry::Entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(pub i64);

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId(value)
    }
}

impl From<RecordId> for i64 {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

/// Snapshot handed to the store. Totals are frozen from `entries` here, so a
/// persisted record never disagrees with its own rows.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHistoryRecord {
    pub entries: Vec<Entry>,
    pub total_weight: f64,
    pub total_element: f64,
}

impl NewHistoryRecord {
    pub fn from_entries(entries: &[Entry]) -> Self {
        let entries: Vec<Entry> = entries.iter().copied().map(Entry::normalized).collect();
        let totals = compute_totals(&entries);
        Self {
            entries,
            total_weight: totals.total_weight,
            total_element: totals.total_element,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub id: RecordId,
    pub timestamp_ms: i64,
    pub entries: Vec<Entry>,
    pub total_weight: f64,
    pub total_element: f64,
}

impl HistoryRecord {
    pub fn ratio_percent(&self) -> f64 {
        ratio_percent(self.total_weight, self.total_element)
    }

    pub fn summary(&self) -> HistorySummary {
        let details = self
            .entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| EntryDetail {
                position: idx + 1,
                weight: format_number(entry.weight, DETAIL_WEIGHT_PLACES),
                percent: format!("{}%", format_number(entry.percent, DECIMAL_PLACES)),
                product: format_number(entry.product(), DECIMAL_PLACES),
            })
            .collect();

        HistorySummary {
            id: self.id,
            saved_at: format_timestamp(self.timestamp_ms),
            total_weight: format_number(self.total_weight, WEIGHT_TOTAL_PLACES),
            total_element: format_number(self.total_element, DECIMAL_PLACES),
            ratio_percent: format!("{}%", format_number(self.ratio_percent(), DECIMAL_PLACES)),
            details,
        }
    }
}

/// One rendered line of the history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySummary {
    pub id: RecordId,
    pub saved_at: String,
    pub total_weight: String,
    pub total_element: String,
    pub ratio_percent: String,
    pub details: Vec<EntryDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDetail {
    pub position: usize,
    pub weight: String,
    pub percent: String,
    pub product: String,
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp_ms.to_string(),
    }
}
