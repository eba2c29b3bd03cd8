use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::params;

use crate::domain::entities::entry::Entry;
use crate::domain::entities::history::{HistoryRecord, NewHistoryRecord};
use crate::infra::sqlite::schema::{init_db, open_connection};

/// Inserts the record row and all of its entry rows in one transaction and
/// returns the new id.
pub fn insert_history_record(
    db_path: &Path,
    record: &NewHistoryRecord,
    timestamp_ms: i64,
) -> Result<i64> {
    init_db(db_path)?;
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start history save transaction")?;

    tx.execute(
        "INSERT INTO history(timestamp, total_weight, total_element) VALUES (?1, ?2, ?3)",
        params![timestamp_ms, record.total_weight, record.total_element],
    )
    .context("failed to insert history record")?;
    let record_id = tx.last_insert_rowid();

    let mut insert_entry = tx
        .prepare(
            "INSERT INTO history_entry(record_id, position, weight, percent)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .context("failed to prepare history entry insert")?;
    for (position, entry) in record.entries.iter().enumerate() {
        insert_entry
            .execute(params![record_id, position as i64, entry.weight, entry.percent])
            .with_context(|| format!("failed to insert entry {position} of record #{record_id}"))?;
    }
    drop(insert_entry);

    tx.commit().context("failed to commit history save")?;
    Ok(record_id)
}

pub fn list_history_records(db_path: &Path) -> Result<Vec<HistoryRecord>> {
    init_db(db_path)?;
    let conn = open_connection(db_path)?;

    let mut entry_stmt = conn
        .prepare(
            "SELECT record_id, weight, percent
             FROM history_entry
             ORDER BY record_id ASC, position ASC",
        )
        .context("failed to prepare history entry query")?;
    let entry_iter = entry_stmt
        .query_map([], |row| {
            let record_id: i64 = row.get(0)?;
            Ok((
                record_id,
                Entry {
                    weight: row.get(1)?,
                    percent: row.get(2)?,
                },
            ))
        })
        .context("failed to query history entries")?;

    let mut entries_by_record: BTreeMap<i64, Vec<Entry>> = BTreeMap::new();
    for item in entry_iter {
        let (record_id, entry) = item.context("failed to read history entry row")?;
        entries_by_record.entry(record_id).or_default().push(entry);
    }

    let mut record_stmt = conn
        .prepare(
            "SELECT id, timestamp, total_weight, total_element
             FROM history
             ORDER BY id ASC",
        )
        .context("failed to prepare history query")?;
    let records = record_stmt
        .query_map([], |row| {
            let id: i64 = row.get(0)?;
            Ok(HistoryRecord {
                id: id.into(),
                timestamp_ms: row.get(1)?,
                entries: Vec::new(),
                total_weight: row.get(2)?,
                total_element: row.get(3)?,
            })
        })
        .context("failed to query history")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect history")?;

    Ok(records
        .into_iter()
        .map(|mut record| {
            record.entries = entries_by_record
                .remove(&record.id.0)
                .unwrap_or_default();
            record
        })
        .collect())
}

pub fn delete_history_record(db_path: &Path, record_id: i64) -> Result<()> {
    init_db(db_path)?;
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start history delete transaction")?;
    tx.execute(
        "DELETE FROM history_entry WHERE record_id = ?1",
        params![record_id],
    )
    .with_context(|| format!("failed to delete entries for record #{record_id}"))?;
    tx.execute("DELETE FROM history WHERE id = ?1", params![record_id])
        .with_context(|| format!("failed to delete record #{record_id}"))?;
    tx.commit().context("failed to commit history delete")?;
    Ok(())
}

/// Removes every record; `sqlite_sequence` keeps its high-water mark.
pub fn clear_history(db_path: &Path) -> Result<()> {
    init_db(db_path)?;
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start history clear transaction")?;
    tx.execute("DELETE FROM history_entry", [])
        .context("failed to clear history entries")?;
    tx.execute("DELETE FROM history", [])
        .context("failed to clear history")?;
    tx.commit().context("failed to commit history clear")?;
    Ok(())
}
