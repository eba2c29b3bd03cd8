use crate::domain::entities::history::{HistoryRecord, NewHistoryRecord, RecordId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    StorageUnavailable(String),
}

impl std::fmt::Display for RepoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoError::StorageUnavailable(message) => {
                write!(f, "history storage unavailable: {message}")
            }
        }
    }
}

impl std::error::Error for RepoError {}

impl From<anyhow::Error> for RepoError {
    fn from(err: anyhow::Error) -> Self {
        RepoError::StorageUnavailable(format!("{err:#}"))
    }
}

/// Persistence of saved snapshots. Ids come from the store, only ever grow,
/// and are not handed out again after `delete_by_id` or `clear_all`.
pub trait HistoryRepository: Send + Sync {
    fn init(&self) -> Result<(), RepoError>;

    fn save(&self, record: NewHistoryRecord) -> Result<RecordId, RepoError>;
    /// Storage order; callers sort.
    fn list_all(&self) -> Result<Vec<HistoryRecord>, RepoError>;
    /// Missing ids are not an error.
    fn delete_by_id(&self, id: RecordId) -> Result<(), RepoError>;
    fn clear_all(&self) -> Result<(), RepoError>;
}
