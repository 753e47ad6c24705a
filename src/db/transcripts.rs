//! Transcript persistence, one row per meeting.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use super::meetings::parse_ts;
use super::schemas::{Transcript, TranscriptSource};

fn from_row(row: &Row) -> rusqlite::Result<Transcript> {
    let source: String = row.get(2)?;
    let updated_at: String = row.get(3)?;
    Ok(Transcript {
        meeting_id: row.get(0)?,
        text: row.get(1)?,
        source: TranscriptSource::parse(&source).ok_or(rusqlite::Error::InvalidQuery)?,
        updated_at: parse_ts(&updated_at)?,
    })
}

pub struct TranscriptRepository;

impl TranscriptRepository {
    /// Insert a transcript. Fails if the meeting already has one.
    pub fn add(conn: &Connection, transcript: &Transcript) -> Result<()> {
        conn.execute(
            "INSERT INTO transcripts (meeting_id, text, source, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                transcript.meeting_id,
                transcript.text,
                transcript.source.as_str(),
                transcript.updated_at.to_rfc3339(),
            ],
        )
        .context("Failed to insert transcript")?;
        Ok(())
    }

    /// Insert-or-replace. Transcripts are overwritten, never versioned.
    pub fn put(conn: &Connection, transcript: &Transcript) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO transcripts (meeting_id, text, source, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                transcript.meeting_id,
                transcript.text,
                transcript.source.as_str(),
                transcript.updated_at.to_rfc3339(),
            ],
        )
        .context("Failed to put transcript")?;
        Ok(())
    }

    pub fn get(conn: &Connection, meeting_id: i64) -> Result<Option<Transcript>> {
        let mut stmt = conn
            .prepare("SELECT meeting_id, text, source, updated_at FROM transcripts WHERE meeting_id = ?1")
            .context("Failed to prepare transcript query")?;

        let mut rows = stmt
            .query_map(params![meeting_id], from_row)
            .context("Failed to query transcript")?;

        match rows.next() {
            Some(Ok(record)) => Ok(Some(record)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    pub fn get_all(conn: &Connection) -> Result<Vec<Transcript>> {
        let mut stmt = conn
            .prepare("SELECT meeting_id, text, source, updated_at FROM transcripts")
            .context("Failed to prepare transcripts query")?;

        let rows = stmt
            .query_map([], from_row)
            .context("Failed to query transcripts")?;

        let mut transcripts = Vec::new();
        for row in rows {
            transcripts.push(row?);
        }
        Ok(transcripts)
    }

    pub fn delete(conn: &Connection, meeting_id: i64) -> Result<()> {
        conn.execute(
            "DELETE FROM transcripts WHERE meeting_id = ?1",
            params![meeting_id],
        )
        .context("Failed to delete transcript")?;
        Ok(())
    }

    pub fn clear(conn: &Connection) -> Result<()> {
        conn.execute("DELETE FROM transcripts", [])
            .context("Failed to clear transcripts")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::db::init::migrate;

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    fn transcript(meeting_id: i64, text: &str, source: TranscriptSource) -> Transcript {
        Transcript {
            meeting_id,
            text: text.to_string(),
            source,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_rejects_duplicate_meeting() {
        let conn = setup_db();
        TranscriptRepository::add(&conn, &transcript(1, "hola", TranscriptSource::Live)).unwrap();
        let err =
            TranscriptRepository::add(&conn, &transcript(1, "otra", TranscriptSource::Manual));
        assert!(err.is_err());
    }

    #[test]
    fn test_put_overwrites() {
        let conn = setup_db();
        TranscriptRepository::put(&conn, &transcript(1, "v1", TranscriptSource::Live)).unwrap();
        TranscriptRepository::put(&conn, &transcript(1, "v2", TranscriptSource::Manual)).unwrap();

        let stored = TranscriptRepository::get(&conn, 1).unwrap().unwrap();
        assert_eq!(stored.text, "v2");
        assert_eq!(stored.source, TranscriptSource::Manual);
        assert_eq!(TranscriptRepository::get_all(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_noop_when_absent() {
        let conn = setup_db();
        TranscriptRepository::delete(&conn, 7).unwrap();
        assert!(TranscriptRepository::get(&conn, 7).unwrap().is_none());
    }
}
