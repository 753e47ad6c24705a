//! Meeting record persistence.
//!
//! Raw SQL with rusqlite, no ORM. Timestamps are stored as RFC 3339 text,
//! tags as a JSON array.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use super::schemas::{Meeting, NewMeeting};
use crate::meeting::status::MeetingStatus;

pub(crate) fn parse_ts(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| rusqlite::Error::InvalidQuery)
}

const COLUMNS: &str =
    "id, title, started_at, ended_at, duration_ms, tags, status, audio_path, created_at";

fn from_row(row: &Row) -> rusqlite::Result<Meeting> {
    let started_at: String = row.get(2)?;
    let ended_at: String = row.get(3)?;
    let tags: String = row.get(5)?;
    let status: String = row.get(6)?;
    let created_at: String = row.get(8)?;

    Ok(Meeting {
        id: row.get(0)?,
        title: row.get(1)?,
        started_at: parse_ts(&started_at)?,
        ended_at: parse_ts(&ended_at)?,
        duration_ms: row.get(4)?,
        tags: serde_json::from_str(&tags).map_err(|_| rusqlite::Error::InvalidQuery)?,
        status: MeetingStatus::parse(&status).ok_or(rusqlite::Error::InvalidQuery)?,
        audio_path: row.get(7)?,
        created_at: parse_ts(&created_at)?,
    })
}

pub struct MeetingRepository;

impl MeetingRepository {
    /// Insert a new meeting (status = recorded). Returns the assigned id.
    pub fn add(conn: &Connection, meeting: &NewMeeting) -> Result<i64> {
        conn.execute(
            "INSERT INTO meetings (title, started_at, ended_at, duration_ms, tags, status, audio_path, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                meeting.title,
                meeting.started_at.to_rfc3339(),
                meeting.ended_at.to_rfc3339(),
                meeting.duration_ms(),
                serde_json::to_string(&meeting.tags)?,
                MeetingStatus::Recorded.as_str(),
                meeting.audio_path,
                Utc::now().to_rfc3339(),
            ],
        )
        .context("Failed to insert meeting")?;

        Ok(conn.last_insert_rowid())
    }

    /// Insert-or-replace a full meeting record by id.
    pub fn put(conn: &Connection, meeting: &Meeting) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO meetings (id, title, started_at, ended_at, duration_ms, tags, status, audio_path, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                meeting.id,
                meeting.title,
                meeting.started_at.to_rfc3339(),
                meeting.ended_at.to_rfc3339(),
                meeting.duration_ms,
                serde_json::to_string(&meeting.tags)?,
                meeting.status.as_str(),
                meeting.audio_path,
                meeting.created_at.to_rfc3339(),
            ],
        )
        .context("Failed to put meeting")?;
        Ok(())
    }

    pub fn get(conn: &Connection, id: i64) -> Result<Option<Meeting>> {
        let mut stmt = conn
            .prepare(&format!("SELECT {COLUMNS} FROM meetings WHERE id = ?1"))
            .context("Failed to prepare meeting query")?;

        let mut rows = stmt
            .query_map(params![id], from_row)
            .context("Failed to query meeting")?;

        match rows.next() {
            Some(Ok(record)) => Ok(Some(record)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    /// All meetings in storage order; callers sort.
    pub fn get_all(conn: &Connection) -> Result<Vec<Meeting>> {
        let mut stmt = conn
            .prepare(&format!("SELECT {COLUMNS} FROM meetings"))
            .context("Failed to prepare meetings query")?;

        let rows = stmt
            .query_map([], from_row)
            .context("Failed to query meetings")?;

        let mut meetings = Vec::new();
        for row in rows {
            meetings.push(row?);
        }
        Ok(meetings)
    }

    /// Meetings newest first, for listings.
    pub fn list(conn: &Connection, limit: usize) -> Result<Vec<Meeting>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM meetings ORDER BY started_at DESC, id DESC LIMIT ?1"
            ))
            .context("Failed to prepare meetings list query")?;

        let rows = stmt
            .query_map(params![limit as i64], from_row)
            .context("Failed to list meetings")?;

        let mut meetings = Vec::new();
        for row in rows {
            meetings.push(row?);
        }
        Ok(meetings)
    }

    pub fn update_status(conn: &Connection, id: i64, status: MeetingStatus) -> Result<()> {
        conn.execute(
            "UPDATE meetings SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )
        .context("Failed to update meeting status")?;
        Ok(())
    }

    /// Removes the meeting row if present. Returns whether a row was deleted.
    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let deleted = conn
            .execute("DELETE FROM meetings WHERE id = ?1", params![id])
            .context("Failed to delete meeting")?;
        Ok(deleted > 0)
    }

    pub fn clear(conn: &Connection) -> Result<()> {
        conn.execute("DELETE FROM meetings", [])
            .context("Failed to clear meetings")?;
        Ok(())
    }
}
