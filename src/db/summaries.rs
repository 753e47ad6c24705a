//! Summary persistence. The structured minutes are stored as one JSON blob,
//! keyed by the meeting id.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use super::meetings::parse_ts;
use super::schemas::Summary;

fn from_row(row: &Row) -> rusqlite::Result<Summary> {
    let data: String = row.get(1)?;
    let created_at: String = row.get(2)?;
    Ok(Summary {
        meeting_id: row.get(0)?,
        data: serde_json::from_str(&data).map_err(|_| rusqlite::Error::InvalidQuery)?,
        created_at: parse_ts(&created_at)?,
    })
}

pub struct SummaryRepository;

impl SummaryRepository {
    /// Insert a summary. Fails if the meeting already has one.
    pub fn add(conn: &Connection, summary: &Summary) -> Result<()> {
        conn.execute(
            "INSERT INTO summaries (meeting_id, data, created_at) VALUES (?1, ?2, ?3)",
            params![
                summary.meeting_id,
                serde_json::to_string(&summary.data)?,
                summary.created_at.to_rfc3339(),
            ],
        )
        .context("Failed to insert summary")?;
        Ok(())
    }

    /// Insert-or-replace. A summarization re-run overwrites the prior minutes.
    pub fn put(conn: &Connection, summary: &Summary) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO summaries (meeting_id, data, created_at) VALUES (?1, ?2, ?3)",
            params![
                summary.meeting_id,
                serde_json::to_string(&summary.data)?,
                summary.created_at.to_rfc3339(),
            ],
        )
        .context("Failed to put summary")?;
        Ok(())
    }

    pub fn get(conn: &Connection, meeting_id: i64) -> Result<Option<Summary>> {
        let mut stmt = conn
            .prepare("SELECT meeting_id, data, created_at FROM summaries WHERE meeting_id = ?1")
            .context("Failed to prepare summary query")?;

        let mut rows = stmt
            .query_map(params![meeting_id], from_row)
            .context("Failed to query summary")?;

        match rows.next() {
            Some(Ok(record)) => Ok(Some(record)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    pub fn get_all(conn: &Connection) -> Result<Vec<Summary>> {
        let mut stmt = conn
            .prepare("SELECT meeting_id, data, created_at FROM summaries")
            .context("Failed to prepare summaries query")?;

        let rows = stmt
            .query_map([], from_row)
            .context("Failed to query summaries")?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?);
        }
        Ok(summaries)
    }

    pub fn delete(conn: &Connection, meeting_id: i64) -> Result<()> {
        conn.execute(
            "DELETE FROM summaries WHERE meeting_id = ?1",
            params![meeting_id],
        )
        .context("Failed to delete summary")?;
        Ok(())
    }

    pub fn clear(conn: &Connection) -> Result<()> {
        conn.execute("DELETE FROM summaries", [])
            .context("Failed to clear summaries")?;
        Ok(())
    }
}
