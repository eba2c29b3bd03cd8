use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::history::HistoryRecord;
use crate::domain::entities::table::WorkingTable;

pub struct AppState {
    pub table: Signal<WorkingTable>,
    /// Bumped whenever rows are rebuilt wholesale so inputs are re-created
    /// from the table instead of keeping stale text.
    pub table_generation: Signal<u64>,
    pub history: Signal<Vec<HistoryRecord>>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            table: use_signal(WorkingTable::new),
            table_generation: use_signal(|| 0_u64),
            history: use_signal(Vec::<HistoryRecord>::new),
            busy: use_signal(|| false),
            status: use_signal(|| "就緒".to_string()),
        }
    }
}
