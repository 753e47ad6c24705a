use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open (creating if needed) the database at `path` and run migrations.
pub fn open_at(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }

    let conn = Connection::open(path).context("Failed to open database connection")?;

    migrate(&conn)?;

    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS meetings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            started_at TEXT NOT NULL,
            ended_at TEXT NOT NULL,
            duration_ms INTEGER NOT NULL,
            tags TEXT NOT NULL DEFAULT '[]',
            status TEXT NOT NULL DEFAULT 'recorded',
            audio_path TEXT,
            created_at TEXT NOT NULL
        )",
        [],
    )
    .context("Failed to create meetings table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_meetings_started_at ON meetings(started_at DESC)",
        [],
    )
    .context("Failed to create meetings started_at index")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_meetings_status ON meetings(status)",
        [],
    )
    .context("Failed to create meetings status index")?;

    // One transcript per meeting, keyed by the meeting id.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS transcripts (
            meeting_id INTEGER PRIMARY KEY,
            text TEXT NOT NULL,
            source TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )
    .context("Failed to create transcripts table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS summaries (
            meeting_id INTEGER PRIMARY KEY,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )
    .context("Failed to create summaries table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS action_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            meeting_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            assignee TEXT NOT NULL,
            due_date TEXT,
            priority TEXT NOT NULL,
            status TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )
    .context("Failed to create action_items table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_action_items_meeting_id ON action_items(meeting_id)",
        [],
    )
    .context("Failed to create action_items meeting_id index")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_action_items_status ON action_items(status)",
        [],
    )
    .context("Failed to create action_items status index")?;

    Ok(())
}
