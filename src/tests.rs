use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Connection;

use crate::config::{ensure_webview_data_dir, AppConfig, DB_FILE_NAME};
use crate::domain::entities::entry::Entry;
use crate::domain::entities::history::{NewHistoryRecord, RecordId};
use crate::domain::entities::table::{WorkingTable, DEFAULT_ROW_COUNT};
use crate::infra::sqlite::queries::{insert_history_record, list_history_records};
use crate::infra::sqlite::repo::SqliteRepo;
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::repo::{HistoryRepository, RepoError};
use crate::usecase::services::history_service::HistoryService;

fn unique_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("iron-calc-{prefix}-{nanos}"))
}

fn sample_entries() -> Vec<Entry> {
    vec![Entry::new(100.0, 50.0), Entry::new(200.0, 25.0)]
}

fn service_for(db_path: PathBuf) -> HistoryService {
    HistoryService::new(Arc::new(SqliteRepo::new(db_path)))
}

#[test]
fn init_db_creates_required_tables() {
    let temp_dir = unique_test_dir("init-db");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    let result = init_db(&db_path);

    assert!(result.is_ok(), "init_db should succeed: {result:?}");

    let conn = Connection::open(&db_path).expect("should open sqlite db");
    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('history','history_entry')",
            [],
            |row| row.get(0),
        )
        .expect("table count query should succeed");

    assert_eq!(table_count, 2, "required tables should exist");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn init_db_is_idempotent() {
    let temp_dir = unique_test_dir("init-twice");
    let db_path = temp_dir.join("nested").join("app.sqlite");

    init_db(&db_path).expect("first init should create parent dirs");
    init_db(&db_path).expect("second init should succeed");

    assert!(db_path.is_file(), "db file should exist");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn save_then_list_returns_identical_record() {
    let temp_dir = unique_test_dir("save-list");
    let repo = SqliteRepo::new(temp_dir.join("app.sqlite"));
    repo.init().expect("init should succeed");

    let record = NewHistoryRecord::from_entries(&sample_entries());
    let id = repo.save(record.clone()).expect("save should succeed");

    let records = repo.list_all().expect("list should succeed");
    assert_eq!(records.len(), 1, "exactly one record should be stored");
    let stored = &records[0];
    assert_eq!(stored.id, id);
    assert_eq!(stored.entries, record.entries);
    assert_eq!(stored.total_weight, record.total_weight);
    assert_eq!(stored.total_element, record.total_element);
    assert!(stored.timestamp_ms > 0, "timestamp should be set by the store");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn save_keeps_entry_order_and_empty_records() {
    let temp_dir = unique_test_dir("entry-order");
    let db_path = temp_dir.join("app.sqlite");

    let entries: Vec<Entry> = (0..12_u32)
        .map(|idx| Entry::new(f64::from(12 - idx), f64::from(idx) * 1.5))
        .collect();
    let full_id = insert_history_record(&db_path, &NewHistoryRecord::from_entries(&entries), 1)
        .expect("full record should save");
    let empty_id = insert_history_record(&db_path, &NewHistoryRecord::from_entries(&[]), 2)
        .expect("empty record should save");

    let records = list_history_records(&db_path).expect("list should succeed");
    let full = records
        .iter()
        .find(|r| r.id.0 == full_id)
        .expect("full record should be listed");
    let empty = records
        .iter()
        .find(|r| r.id.0 == empty_id)
        .expect("empty record should be listed");

    assert_eq!(full.entries, entries);
    assert!(empty.entries.is_empty());
    assert_eq!(empty.total_weight, 0.0);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn failed_save_leaves_no_partial_record() {
    let temp_dir = unique_test_dir("atomic-save");
    let repo = SqliteRepo::new(temp_dir.join("app.sqlite"));
    repo.init().expect("init should succeed");

    let conn = Connection::open(&repo.db_path).expect("should open sqlite db");
    conn.execute_batch(
        "CREATE TRIGGER reject_second_entry BEFORE INSERT ON history_entry
         WHEN NEW.position = 1
         BEGIN SELECT RAISE(ABORT, 'second entry rejected'); END;",
    )
    .expect("trigger should be created");

    let err = repo
        .save(NewHistoryRecord::from_entries(&sample_entries()))
        .expect_err("save should fail on the second entry");
    assert!(matches!(err, RepoError::StorageUnavailable(_)));
    assert!(
        err.to_string().contains("second entry rejected"),
        "unexpected error: {err}"
    );

    assert!(repo.list_all().expect("list should succeed").is_empty());
    let orphan_entries: i64 = conn
        .query_row("SELECT COUNT(*) FROM history_entry", [], |row| row.get(0))
        .expect("entry count query should succeed");
    assert_eq!(orphan_entries, 0, "no entry rows should survive a failed save");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[tokio::test]
async fn saving_non_finite_entries_stores_zero() {
    let temp_dir = unique_test_dir("non-finite-save");
    let service = service_for(temp_dir.join("app.sqlite"));

    let mut table = WorkingTable::new();
    table.replace_all(vec![Entry::new(100.0, 50.0)]);
    table.add_entry(f64::NAN, 10.0);
    table.add_entry(f64::INFINITY, 10.0);
    let view = table.view();
    assert_eq!(view.total_weight, "100");
    assert_eq!(view.ratio_percent, "50%");

    service
        .save_snapshot(table.entries())
        .await
        .expect("a table with non-finite input should save");

    // Raw entries that never went through the table are normalised as well.
    let raw = [Entry {
        weight: f64::NAN,
        percent: f64::INFINITY,
    }];
    service
        .save_snapshot(&raw)
        .await
        .expect("raw non-finite entries should save");

    let records = service
        .list_newest_first()
        .await
        .expect("list should succeed");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].entries, vec![Entry::default()]);
    assert_eq!(
        records[1].entries,
        vec![
            Entry::new(100.0, 50.0),
            Entry::new(0.0, 10.0),
            Entry::new(0.0, 10.0),
        ]
    );
    assert_eq!(records[1].total_weight, 100.0);
    assert_eq!(records[1].summary().ratio_percent, "50%");

    let mut restored = WorkingTable::new();
    let view = restored.replace_all(records[1].entries.clone());
    assert_eq!(view.total_weight, "100");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn ids_are_never_reused_after_delete() {
    let temp_dir = unique_test_dir("delete-ids");
    let repo = SqliteRepo::new(temp_dir.join("app.sqlite"));

    let first = repo
        .save(NewHistoryRecord::from_entries(&sample_entries()))
        .expect("first save");
    let second = repo
        .save(NewHistoryRecord::from_entries(&sample_entries()))
        .expect("second save");
    repo.delete_by_id(second).expect("delete should succeed");

    let third = repo
        .save(NewHistoryRecord::from_entries(&[]))
        .expect("third save");

    assert!(second > first);
    assert!(third > second, "deleted id must not be issued again");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn deleting_missing_id_is_a_noop() {
    let temp_dir = unique_test_dir("delete-missing");
    let repo = SqliteRepo::new(temp_dir.join("app.sqlite"));
    let id = repo
        .save(NewHistoryRecord::from_entries(&sample_entries()))
        .expect("save should succeed");
    let before = repo.list_all().expect("list should succeed");

    repo.delete_by_id(RecordId(id.0 + 100))
        .expect("deleting a missing id should not fail");

    assert_eq!(repo.list_all().expect("list should succeed"), before);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn delete_removes_only_the_target_record() {
    let temp_dir = unique_test_dir("delete-one");
    let repo = SqliteRepo::new(temp_dir.join("app.sqlite"));
    let keep = repo
        .save(NewHistoryRecord::from_entries(&sample_entries()))
        .expect("save keep");
    let drop_id = repo
        .save(NewHistoryRecord::from_entries(&[Entry::new(5.0, 5.0)]))
        .expect("save drop");

    repo.delete_by_id(drop_id).expect("delete should succeed");

    let records = repo.list_all().expect("list should succeed");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, keep);
    assert_eq!(records[0].entries, sample_entries());

    let conn = Connection::open(&repo.db_path).expect("should open sqlite db");
    let entry_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM history_entry WHERE record_id = ?1",
            [drop_id.0],
            |row| row.get(0),
        )
        .expect("entry count query should succeed");
    assert_eq!(entry_count, 0, "entries of the deleted record should be gone");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn clear_all_empties_store_but_keeps_id_counter() {
    let temp_dir = unique_test_dir("clear-all");
    let repo = SqliteRepo::new(temp_dir.join("app.sqlite"));
    let mut last = RecordId(0);
    for _ in 0..3 {
        last = repo
            .save(NewHistoryRecord::from_entries(&sample_entries()))
            .expect("save should succeed");
    }

    repo.clear_all().expect("clear should succeed");
    assert!(repo.list_all().expect("list should succeed").is_empty());

    let next = repo
        .save(NewHistoryRecord::from_entries(&sample_entries()))
        .expect("save after clear should succeed");
    assert!(next > last, "id after clear must exceed {last:?}, got {next:?}");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn unusable_path_reports_storage_unavailable() {
    let temp_dir = unique_test_dir("unavailable");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let blocker = temp_dir.join("not-a-dir");
    fs::write(&blocker, "file in the way").expect("should write blocker file");

    let repo = SqliteRepo::new(blocker.join("app.sqlite"));

    let err = repo.init().expect_err("init should fail");
    assert!(matches!(err, RepoError::StorageUnavailable(_)));
    assert!(
        err.to_string().contains("failed to create parent dir"),
        "unexpected error: {err}"
    );
    assert!(matches!(
        repo.save(NewHistoryRecord::from_entries(&sample_entries())),
        Err(RepoError::StorageUnavailable(_))
    ));
    assert!(matches!(
        repo.list_all(),
        Err(RepoError::StorageUnavailable(_))
    ));

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[tokio::test]
async fn service_save_snapshot_freezes_working_table() {
    let temp_dir = unique_test_dir("service-save");
    let service = service_for(temp_dir.join("app.sqlite"));
    service.init().await.expect("init should succeed");

    let mut table = WorkingTable::new();
    table.replace_all(sample_entries());
    let id = service
        .save_snapshot(table.entries())
        .await
        .expect("save should succeed");

    table.set_weight(1, "999");
    table.add_entry(1.0, 1.0);

    let records = service
        .list_newest_first()
        .await
        .expect("list should succeed");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, id);
    assert_eq!(records[0].entries, sample_entries());
    assert!((records[0].total_weight - 300.0).abs() < 1e-9);
    assert!((records[0].total_element - 100.0).abs() < 1e-9);
    assert_eq!(records[0].summary().ratio_percent, "33.3333%");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[tokio::test]
async fn service_lists_newest_first_and_reflects_mutations() {
    let temp_dir = unique_test_dir("service-order");
    let service = service_for(temp_dir.join("app.sqlite"));

    let mut ids = Vec::new();
    for weight in [10.0, 20.0, 30.0] {
        let id = service
            .save_snapshot(&[Entry::new(weight, 10.0)])
            .await
            .expect("save should succeed");
        ids.push(id);
    }

    let listed: Vec<RecordId> = service
        .list_newest_first()
        .await
        .expect("list should succeed")
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(listed, vec![ids[2], ids[1], ids[0]]);

    service.delete(ids[1]).await.expect("delete should succeed");
    let listed: Vec<RecordId> = service
        .list_newest_first()
        .await
        .expect("list should succeed")
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(listed, vec![ids[2], ids[0]]);

    service.clear().await.expect("clear should succeed");
    assert!(service
        .list_newest_first()
        .await
        .expect("list should succeed")
        .is_empty());

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[tokio::test]
async fn restoring_records_replaces_the_working_table() {
    let temp_dir = unique_test_dir("service-restore");
    let service = service_for(temp_dir.join("app.sqlite"));

    let mut table = WorkingTable::new();
    table.replace_all(vec![
        Entry::new(1.0, 1.0),
        Entry::new(2.0, 2.0),
        Entry::new(3.0, 3.0),
        Entry::new(4.0, 4.0),
    ]);
    service
        .save_snapshot(table.entries())
        .await
        .expect("save should succeed");
    service
        .save_snapshot(&[])
        .await
        .expect("empty save should succeed");

    let records = service
        .list_newest_first()
        .await
        .expect("list should succeed");
    let empty = &records[0];
    let full = &records[1];

    let mut restored = WorkingTable::new();
    restored.replace_all(full.entries.clone());
    assert_eq!(restored.entries(), table.entries());

    // An empty snapshot restores to the default rows, not to zero rows.
    let view = restored.replace_all(empty.entries.clone());
    assert_eq!(view.rows.len(), DEFAULT_ROW_COUNT);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[tokio::test]
async fn service_surfaces_storage_errors_without_touching_table() {
    let temp_dir = unique_test_dir("service-error");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let blocker = temp_dir.join("blocked");
    fs::write(&blocker, "file in the way").expect("should write blocker file");
    let service = service_for(blocker.join("app.sqlite"));

    let mut table = WorkingTable::new();
    table.replace_all(sample_entries());
    let before = table.clone();

    let err = service
        .save_snapshot(table.entries())
        .await
        .expect_err("save should fail");
    assert!(matches!(err, RepoError::StorageUnavailable(_)));
    assert!(service.clear().await.is_err());
    assert_eq!(table, before);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn config_prefers_db_override() {
    let temp_dir = unique_test_dir("config-override");
    let custom = temp_dir.join("custom.sqlite");

    let config = AppConfig::resolve(Some(custom.clone()), temp_dir.clone())
        .expect("config should resolve");

    assert_eq!(config.db_path, custom);
    assert_eq!(config.webview_data_dir, temp_dir.join("webview2"));

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn config_falls_back_to_data_dir() {
    let temp_dir = unique_test_dir("config-default");

    let config = AppConfig::resolve(Some(PathBuf::new()), temp_dir.clone())
        .expect("config should resolve");
    assert_eq!(config.db_path, temp_dir.join(DB_FILE_NAME));

    let config = AppConfig::resolve(None, temp_dir.clone()).expect("config should resolve");
    assert_eq!(config.db_path, temp_dir.join(DB_FILE_NAME));

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn ensure_webview_data_dir_creates_webview2_subdir() {
    let temp_dir = unique_test_dir("webview-data-dir");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");

    let webview_dir =
        ensure_webview_data_dir(&temp_dir).expect("webview data dir should be created");

    assert_eq!(webview_dir, temp_dir.join("webview2"));
    assert!(webview_dir.is_dir(), "webview2 directory should exist");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}
