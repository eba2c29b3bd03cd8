use std::sync::Arc;

use tracing::warn;

use crate::domain::entities::entry::Entry;
use crate::domain::entities::history::{HistoryRecord, NewHistoryRecord, RecordId};
use crate::platform::desktop::blocking::run_blocking;
use crate::usecase::ports::repo::{HistoryRepository, RepoError};

/// Async face of the history store. Every call is awaited to completion, so a
/// list issued after a mutation always sees that mutation.
#[derive(Clone)]
pub struct HistoryService {
    repo: Arc<dyn HistoryRepository>,
}

impl HistoryService {
    pub fn new(repo: Arc<dyn HistoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn init(&self) -> Result<(), RepoError> {
        let repo = self.repo.clone();
        run_blocking(move || repo.init()).await.inspect_err(log_failure)
    }

    /// Copies `entries` and their totals into a new record.
    pub async fn save_snapshot(&self, entries: &[Entry]) -> Result<RecordId, RepoError> {
        let record = NewHistoryRecord::from_entries(entries);
        let repo = self.repo.clone();
        run_blocking(move || repo.save(record))
            .await
            .inspect_err(log_failure)
    }

    pub async fn list_newest_first(&self) -> Result<Vec<HistoryRecord>, RepoError> {
        let repo = self.repo.clone();
        let mut records = run_blocking(move || repo.list_all())
            .await
            .inspect_err(log_failure)?;
        records.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(records)
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), RepoError> {
        let repo = self.repo.clone();
        run_blocking(move || repo.delete_by_id(id))
            .await
            .inspect_err(log_failure)
    }

    pub async fn clear(&self) -> Result<(), RepoError> {
        let repo = self.repo.clone();
        run_blocking(move || repo.clear_all())
            .await
            .inspect_err(log_failure)
    }
}

fn log_failure(err: &RepoError) {
    warn!(error = %err, "history store operation failed");
}
