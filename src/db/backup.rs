//! Flat JSON export/import of everything in the store.
//!
//! The export is a denormalized dump with one top-level key per record kind.
//! Audio artifacts are files on disk and are excluded: meeting records are
//! exported with their `audio_path` stripped.

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use super::action_items::ActionItemRepository;
use super::meetings::MeetingRepository;
use super::schemas::{ActionItem, Meeting, Summary, Transcript};
use super::summaries::SummaryRepository;
use super::transcripts::TranscriptRepository;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Backup {
    pub meetings: Vec<Meeting>,
    pub transcripts: Vec<Transcript>,
    pub summaries: Vec<Summary>,
    pub action_items: Vec<ActionItem>,
}

/// Dump all four record kinds, audio paths stripped.
pub fn snapshot(conn: &Connection) -> Result<Backup> {
    let meetings = MeetingRepository::get_all(conn)?
        .into_iter()
        .map(|mut m| {
            m.audio_path = None;
            m
        })
        .collect();

    Ok(Backup {
        meetings,
        transcripts: TranscriptRepository::get_all(conn)?,
        summaries: SummaryRepository::get_all(conn)?,
        action_items: ActionItemRepository::get_all(conn)?,
    })
}

/// Replace the store contents with a backup, treating it as the sole source
/// of truth: every kind is cleared first, then re-inserted with original ids.
pub fn restore(conn: &mut Connection, backup: &Backup) -> Result<()> {
    let tx = conn.transaction().context("Failed to begin import")?;

    MeetingRepository::clear(&tx)?;
    TranscriptRepository::clear(&tx)?;
    SummaryRepository::clear(&tx)?;
    ActionItemRepository::clear(&tx)?;

    for meeting in &backup.meetings {
        MeetingRepository::put(&tx, meeting)?;
    }
    for transcript in &backup.transcripts {
        TranscriptRepository::put(&tx, transcript)?;
    }
    for summary in &backup.summaries {
        SummaryRepository::put(&tx, summary)?;
    }
    for item in &backup.action_items {
        ActionItemRepository::put(&tx, item)?;
    }

    tx.commit().context("Failed to commit import")?;
    Ok(())
}
