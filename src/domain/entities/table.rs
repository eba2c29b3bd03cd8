use tracing::debug;

use crate::domain::aggregation::{
    compute_totals, format_number, parse_numeric, DECIMAL_PLACES, WEIGHT_TOTAL_PLACES,
};
use crate::domain::entities::entry::{Entry, Totals};

pub const DEFAULT_ROW_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Weight,
    Percent,
}

/// Rendered row of the working table. `position` is 1-based and is
/// recomputed on every view, it is not an identity.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub position: usize,
    pub weight: f64,
    pub percent: f64,
    pub product: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub rows: Vec<RowView>,
    pub totals: Totals,
    pub total_weight: String,
    pub total_element: String,
    pub ratio_percent: String,
}

/// The mutable, unsaved table the user is editing.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingTable {
    entries: Vec<Entry>,
}

impl Default for WorkingTable {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkingTable {
    pub fn new() -> Self {
        Self {
            entries: default_entries(),
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn snapshot(&self) -> Vec<Entry> {
        self.entries.clone()
    }

    pub fn add_entry(&mut self, weight: f64, percent: f64) -> TableView {
        self.entries.push(Entry::new(weight, percent));
        debug!(rows = self.entries.len(), "entry added");
        self.view()
    }

    /// Removes the entry at a 1-based `position`. Out of range does nothing.
    pub fn remove_entry(&mut self, position: usize) -> TableView {
        if let Some(idx) = index_of(position, self.entries.len()) {
            self.entries.remove(idx);
            debug!(position, rows = self.entries.len(), "entry removed");
        }
        self.view()
    }

    /// Installs `entries` as the whole table. An empty sequence falls back to
    /// the default rows, so restoring an empty snapshot does not round-trip.
    pub fn replace_all(&mut self, entries: Vec<Entry>) -> TableView {
        self.entries = if entries.is_empty() {
            default_entries()
        } else {
            entries.into_iter().map(Entry::normalized).collect()
        };
        debug!(rows = self.entries.len(), "table replaced");
        self.view()
    }

    pub fn clear(&mut self) -> TableView {
        self.replace_all(Vec::new())
    }

    pub fn set_field(&mut self, position: usize, field: EntryField, raw: &str) -> TableView {
        if let Some(idx) = index_of(position, self.entries.len()) {
            let value = parse_numeric(raw);
            let entry = &mut self.entries[idx];
            match field {
                EntryField::Weight => entry.weight = value,
                EntryField::Percent => entry.percent = value,
            }
        }
        self.view()
    }

    pub fn set_weight(&mut self, position: usize, raw: &str) -> TableView {
        self.set_field(position, EntryField::Weight, raw)
    }

    pub fn set_percent(&mut self, position: usize, raw: &str) -> TableView {
        self.set_field(position, EntryField::Percent, raw)
    }

    pub fn current_totals(&self) -> Totals {
        compute_totals(&self.entries)
    }

    pub fn view(&self) -> TableView {
        let rows = self
            .entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| RowView {
                position: idx + 1,
                weight: entry.weight,
                percent: entry.percent,
                product: format_number(entry.product(), DECIMAL_PLACES),
            })
            .collect();
        let totals = self.current_totals();

        TableView {
            rows,
            totals,
            total_weight: format_number(totals.total_weight, WEIGHT_TOTAL_PLACES),
            total_element: format_number(totals.total_element, DECIMAL_PLACES),
            ratio_percent: format!("{}%", format_number(totals.ratio_percent, DECIMAL_PLACES)),
        }
    }
}

fn default_entries() -> Vec<Entry> {
    vec![Entry::default(); DEFAULT_ROW_COUNT]
}

fn index_of(position: usize, len: usize) -> Option<usize> {
    if position == 0 || position > len {
        None
    } else {
        Some(position - 1)
    }
}
