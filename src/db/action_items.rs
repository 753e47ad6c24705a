//! Action item persistence. Many items per meeting; the whole per-meeting
//! set is replaced on each summarization, never merged.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, Row};

use super::meetings::parse_ts;
use super::schemas::{ActionItem, ActionStatus, Priority};

/// New action item data before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewActionItem {
    pub meeting_id: i64,
    pub title: String,
    pub assignee: String,
    pub due_date: Option<String>,
    pub priority: Priority,
    pub status: ActionStatus,
}

const COLUMNS: &str = "id, meeting_id, title, assignee, due_date, priority, status, created_at";

fn from_row(row: &Row) -> rusqlite::Result<ActionItem> {
    let priority: String = row.get(5)?;
    let status: String = row.get(6)?;
    let created_at: String = row.get(7)?;
    Ok(ActionItem {
        id: row.get(0)?,
        meeting_id: row.get(1)?,
        title: row.get(2)?,
        assignee: row.get(3)?,
        due_date: row.get(4)?,
        priority: Priority::parse(&priority),
        status: ActionStatus::parse(&status),
        created_at: parse_ts(&created_at)?,
    })
}

pub struct ActionItemRepository;

impl ActionItemRepository {
    pub fn add(conn: &Connection, item: &NewActionItem) -> Result<i64> {
        conn.execute(
            "INSERT INTO action_items (meeting_id, title, assignee, due_date, priority, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                item.meeting_id,
                item.title,
                item.assignee,
                item.due_date,
                item.priority.as_str(),
                item.status.as_str(),
                Utc::now().to_rfc3339(),
            ],
        )
        .context("Failed to insert action item")?;

        Ok(conn.last_insert_rowid())
    }

    pub fn put(conn: &Connection, item: &ActionItem) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO action_items (id, meeting_id, title, assignee, due_date, priority, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                item.id,
                item.meeting_id,
                item.title,
                item.assignee,
                item.due_date,
                item.priority.as_str(),
                item.status.as_str(),
                item.created_at.to_rfc3339(),
            ],
        )
        .context("Failed to put action item")?;
        Ok(())
    }

    pub fn get(conn: &Connection, id: i64) -> Result<Option<ActionItem>> {
        let mut stmt = conn
            .prepare(&format!("SELECT {COLUMNS} FROM action_items WHERE id = ?1"))
            .context("Failed to prepare action item query")?;

        let mut rows = stmt
            .query_map(params![id], from_row)
            .context("Failed to query action item")?;

        match rows.next() {
            Some(Ok(record)) => Ok(Some(record)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    pub fn get_all(conn: &Connection) -> Result<Vec<ActionItem>> {
        let mut stmt = conn
            .prepare(&format!("SELECT {COLUMNS} FROM action_items"))
            .context("Failed to prepare action items query")?;

        let rows = stmt
            .query_map([], from_row)
            .context("Failed to query action items")?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    pub fn get_all_for_meeting(conn: &Connection, meeting_id: i64) -> Result<Vec<ActionItem>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM action_items WHERE meeting_id = ?1 ORDER BY id"
            ))
            .context("Failed to prepare per-meeting action items query")?;

        let rows = stmt
            .query_map(params![meeting_id], from_row)
            .context("Failed to query action items for meeting")?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<()> {
        conn.execute("DELETE FROM action_items WHERE id = ?1", params![id])
            .context("Failed to delete action item")?;
        Ok(())
    }

    pub fn delete_for_meeting(conn: &Connection, meeting_id: i64) -> Result<usize> {
        let deleted = conn
            .execute(
                "DELETE FROM action_items WHERE meeting_id = ?1",
                params![meeting_id],
            )
            .context("Failed to delete action items for meeting")?;
        Ok(deleted)
    }

    pub fn clear(conn: &Connection) -> Result<()> {
        conn.execute("DELETE FROM action_items", [])
            .context("Failed to clear action items")?;
        Ok(())
    }
}
