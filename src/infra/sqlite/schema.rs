use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign key enforcement")?;
    Ok(conn)
}

/// `AUTOINCREMENT` keeps the high-water mark in `sqlite_sequence`, so ids are
/// never reused even after every row is deleted.
pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }

    let conn = open_connection(db_path)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS history (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp     INTEGER NOT NULL,
            total_weight  REAL NOT NULL,
            total_element REAL NOT NULL
        );

        CREATE TABLE IF NOT EXISTS history_entry (
            record_id   INTEGER NOT NULL,
            position    INTEGER NOT NULL,
            weight      REAL NOT NULL,
            percent     REAL NOT NULL,
            PRIMARY KEY (record_id, position),
            FOREIGN KEY (record_id) REFERENCES history(id)
        );
        ",
    )
    .context("failed to initialize schema")?;

    Ok(())
}
