use std::path::PathBuf;

use tracing::info;

use crate::domain::entities::history::{HistoryRecord, NewHistoryRecord, RecordId};
use crate::infra::sqlite::queries::{
    clear_history, delete_history_record, insert_history_record, list_history_records,
};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::repo::{HistoryRepository, RepoError};

pub struct SqliteRepo {
    pub db_path: PathBuf,
}

impl SqliteRepo {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }
}

impl HistoryRepository for SqliteRepo {
    fn init(&self) -> Result<(), RepoError> {
        init_db(&self.db_path)?;
        info!(db = %self.db_path.display(), "history store ready");
        Ok(())
    }

    fn save(&self, record: NewHistoryRecord) -> Result<RecordId, RepoError> {
        let timestamp_ms = chrono::Utc::now().timestamp_millis();
        let id = insert_history_record(&self.db_path, &record, timestamp_ms)?;
        info!(id, rows = record.entries.len(), "history record saved");
        Ok(RecordId(id))
    }

    fn list_all(&self) -> Result<Vec<HistoryRecord>, RepoError> {
        Ok(list_history_records(&self.db_path)?)
    }

    fn delete_by_id(&self, id: RecordId) -> Result<(), RepoError> {
        delete_history_record(&self.db_path, id.into())?;
        info!(id = id.0, "history record deleted");
        Ok(())
    }

    fn clear_all(&self) -> Result<(), RepoError> {
        clear_history(&self.db_path)?;
        info!("history cleared");
        Ok(())
    }
}
