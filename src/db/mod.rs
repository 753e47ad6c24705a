//! Local store: SQLite persistence for the four record kinds.
//!
//! Repositories hold the raw SQL; the [`Database`] facade owns the single
//! process-wide connection and groups every multi-record flow (recording
//! save, summary save, cascade delete, import) in one transaction so a crash
//! partway through cannot leave an inconsistent record set.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub mod action_items;
pub mod backup;
pub mod init;
pub mod meetings;
pub mod schemas;
pub mod summaries;
pub mod transcripts;

pub use action_items::{ActionItemRepository, NewActionItem};
pub use backup::Backup;
pub use meetings::MeetingRepository;
pub use schemas::{
    ActionItem, ActionStatus, Meeting, NewMeeting, Priority, Summary, Transcript, TranscriptSource,
};
pub use summaries::SummaryRepository;
pub use transcripts::TranscriptRepository;

use crate::meeting::status::MeetingStatus;
use crate::summarize::minutes::MeetingMinutes;

/// Async facade over the store connection.
///
/// The connection is opened once at startup and shared; operations lock it
/// for their duration, which gives per-operation atomicity. Cross-operation
/// ordering between independent flows is not guaranteed.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open the store at the default data-dir location.
    pub fn open() -> Result<Self> {
        let path = crate::global::db_file()?;
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = init::open_at(path)?;
        info!("Database ready at {:?}", path);
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        init::migrate(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub async fn meeting(&self, id: i64) -> Result<Option<Meeting>> {
        let conn = self.conn.lock().await;
        MeetingRepository::get(&conn, id)
    }

    pub async fn meetings(&self) -> Result<Vec<Meeting>> {
        let conn = self.conn.lock().await;
        MeetingRepository::get_all(&conn)
    }

    /// Meetings newest first.
    pub async fn list_meetings(&self, limit: usize) -> Result<Vec<Meeting>> {
        let conn = self.conn.lock().await;
        MeetingRepository::list(&conn, limit)
    }

    pub async fn transcript(&self, meeting_id: i64) -> Result<Option<Transcript>> {
        let conn = self.conn.lock().await;
        TranscriptRepository::get(&conn, meeting_id)
    }

    pub async fn summary(&self, meeting_id: i64) -> Result<Option<Summary>> {
        let conn = self.conn.lock().await;
        SummaryRepository::get(&conn, meeting_id)
    }

    pub async fn action_items(&self) -> Result<Vec<ActionItem>> {
        let conn = self.conn.lock().await;
        ActionItemRepository::get_all(&conn)
    }

    pub async fn action_items_for(&self, meeting_id: i64) -> Result<Vec<ActionItem>> {
        let conn = self.conn.lock().await;
        ActionItemRepository::get_all_for_meeting(&conn, meeting_id)
    }

    pub async fn summaries(&self) -> Result<Vec<Summary>> {
        let conn = self.conn.lock().await;
        SummaryRepository::get_all(&conn)
    }

    /// Persist a finished recording: meeting plus, when live recognition
    /// produced text, its transcript — one transaction. A non-empty live
    /// transcript advances the status to `transcribed` on the spot.
    pub async fn save_recording(
        &self,
        new_meeting: &NewMeeting,
        transcript_text: &str,
        source: TranscriptSource,
    ) -> Result<Meeting> {
        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction()
            .context("Failed to begin recording save")?;

        let meeting_id = MeetingRepository::add(&tx, new_meeting)?;

        if !transcript_text.trim().is_empty() {
            TranscriptRepository::add(
                &tx,
                &Transcript {
                    meeting_id,
                    text: transcript_text.to_string(),
                    source,
                    updated_at: Utc::now(),
                },
            )?;

            let status = MeetingStatus::Recorded.after_transcript(transcript_text);
            if status != MeetingStatus::Recorded {
                MeetingRepository::update_status(&tx, meeting_id, status)?;
            }
        }

        let meeting = MeetingRepository::get(&tx, meeting_id)?
            .context("Meeting vanished during save")?;

        tx.commit().context("Failed to commit recording save")?;

        info!(
            "Meeting {} saved ({} ms, transcript: {})",
            meeting.id,
            meeting.duration_ms,
            if transcript_text.trim().is_empty() {
                "none"
            } else {
                "live"
            }
        );

        Ok(meeting)
    }

    /// Overwrite the transcript with manually edited text and apply the
    /// idempotent `recorded → transcribed` transition.
    pub async fn save_transcript(&self, meeting_id: i64, text: &str) -> Result<Meeting> {
        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction()
            .context("Failed to begin transcript save")?;

        let Some(mut meeting) = MeetingRepository::get(&tx, meeting_id)? else {
            bail!("Meeting {} not found", meeting_id);
        };

        TranscriptRepository::put(
            &tx,
            &Transcript {
                meeting_id,
                text: text.to_string(),
                source: TranscriptSource::Manual,
                updated_at: Utc::now(),
            },
        )?;

        let next = meeting.status.after_transcript(text);
        if next != meeting.status {
            MeetingRepository::update_status(&tx, meeting_id, next)?;
            meeting.status = next;
        }

        tx.commit().context("Failed to commit transcript save")?;
        Ok(meeting)
    }

    /// Persist a successful summarization: the minutes overwrite any prior
    /// summary, the meeting's action items are replaced wholesale, and the
    /// status becomes `summarized` — one transaction.
    pub async fn save_summary(
        &self,
        meeting_id: i64,
        minutes: &MeetingMinutes,
    ) -> Result<Meeting> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction().context("Failed to begin summary save")?;

        let Some(mut meeting) = MeetingRepository::get(&tx, meeting_id)? else {
            bail!("Meeting {} not found", meeting_id);
        };

        SummaryRepository::put(
            &tx,
            &Summary {
                meeting_id,
                data: minutes.clone(),
                created_at: Utc::now(),
            },
        )?;

        let replaced = ActionItemRepository::delete_for_meeting(&tx, meeting_id)?;
        for entry in &minutes.action_plan {
            ActionItemRepository::add(&tx, &action_item_from_plan(meeting_id, entry))?;
        }

        let next = meeting.status.after_summary();
        MeetingRepository::update_status(&tx, meeting_id, next)?;
        meeting.status = next;

        tx.commit().context("Failed to commit summary save")?;

        info!(
            "Meeting {} summarized: {} action items ({} replaced)",
            meeting_id,
            minutes.action_plan.len(),
            replaced
        );

        Ok(meeting)
    }

    /// Delete a meeting and everything that depends on it. Returns whether a
    /// meeting was actually removed. The audio artifact file is removed after
    /// the transaction commits; a file-removal failure is logged, not fatal.
    pub async fn delete_meeting(&self, meeting_id: i64) -> Result<bool> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction().context("Failed to begin delete")?;

        let Some(meeting) = MeetingRepository::get(&tx, meeting_id)? else {
            return Ok(false);
        };

        TranscriptRepository::delete(&tx, meeting_id)?;
        SummaryRepository::delete(&tx, meeting_id)?;
        ActionItemRepository::delete_for_meeting(&tx, meeting_id)?;
        MeetingRepository::delete(&tx, meeting_id)?;

        tx.commit().context("Failed to commit delete")?;

        if let Some(path) = &meeting.audio_path {
            if let Err(e) = std::fs::remove_file(path) {
                warn!("Failed to remove audio artifact {}: {}", path, e);
            }
        }

        info!("Meeting {} deleted with its dependents", meeting_id);
        Ok(true)
    }

    pub async fn export(&self) -> Result<Backup> {
        let conn = self.conn.lock().await;
        backup::snapshot(&conn)
    }

    pub async fn import(&self, data: &Backup) -> Result<()> {
        let mut conn = self.conn.lock().await;
        backup::restore(&mut conn, data)
    }
}

fn action_item_from_plan(
    meeting_id: i64,
    entry: &crate::summarize::minutes::ActionPlanEntry,
) -> NewActionItem {
    NewActionItem {
        meeting_id,
        title: if entry.task.trim().is_empty() {
            "Tarea sin título".to_string()
        } else {
            entry.task.clone()
        },
        assignee: if entry.assignee.trim().is_empty() {
            "Por definir".to_string()
        } else {
            entry.assignee.clone()
        },
        due_date: if entry.due_date.trim().is_empty() {
            None
        } else {
            Some(entry.due_date.clone())
        },
        priority: Priority::parse(&entry.priority),
        status: ActionStatus::parse(&entry.status),
    }
}
