//! Application session context.
//!
//! One `App` owns the loaded config and the process-wide database handle;
//! every cross-component flow (summarize, delete, export, dashboard) hangs
//! off it instead of free-floating globals.

use anyhow::{bail, Context, Result};
use chrono::{Months, Utc};
use tracing::info;

use crate::config::Config;
use crate::db::{ActionStatus, Backup, Database, Meeting};
use crate::summarize::{GeminiClient, MeetingMinutes, SummarizeError};

pub struct App {
    pub config: Config,
    pub db: Database,
}

/// Aggregate figures for the dashboard, computed over the last month except
/// for open tasks, which span everything.
#[derive(Debug, Clone, Copy)]
pub struct DashboardStats {
    pub meetings_this_month: usize,
    pub recorded_ms_this_month: i64,
    pub open_tasks: usize,
    /// Share of summaries that produced a non-empty action plan, 0-100.
    pub action_plan_pct: u32,
}

impl App {
    pub fn new(config: Config, db: Database) -> Self {
        Self { config, db }
    }

    /// Open the default database and load (or create) the config file.
    pub fn bootstrap() -> Result<Self> {
        let config = Config::load()?;
        let db = Database::open()?;
        Ok(Self::new(config, db))
    }

    /// Summarize a meeting's transcript into structured minutes and persist
    /// them (summary + replaced action items + status) atomically.
    ///
    /// The empty-transcript precondition is enforced here, before any request
    /// is built. On upstream or parse failure nothing is written and the
    /// meeting's status is untouched, so the call can simply be retried. The
    /// CLI is synchronous, which is what keeps a second request from being
    /// triggered while one is outstanding.
    pub async fn summarize(&self, meeting_id: i64) -> Result<(Meeting, MeetingMinutes)> {
        let Some(meeting) = self.db.meeting(meeting_id).await? else {
            bail!("Meeting {} not found", meeting_id);
        };

        let transcript = self
            .db
            .transcript(meeting_id)
            .await?
            .map(|t| t.text)
            .unwrap_or_default();

        if transcript.trim().is_empty() {
            return Err(SummarizeError::EmptyTranscript)
                .context("Edit the transcript before requesting minutes");
        }

        let client = GeminiClient::new(&self.config.summarizer)?;
        let minutes = client
            .summarize(&transcript, meeting.started_at, meeting.ended_at)
            .await?;

        let meeting = self.db.save_summary(meeting_id, &minutes).await?;

        Ok((meeting, minutes))
    }

    pub async fn save_transcript(&self, meeting_id: i64, text: &str) -> Result<Meeting> {
        self.db.save_transcript(meeting_id, text).await
    }

    pub async fn delete_meeting(&self, meeting_id: i64) -> Result<bool> {
        self.db.delete_meeting(meeting_id).await
    }

    pub async fn export_json(&self) -> Result<String> {
        let backup = self.db.export().await?;
        serde_json::to_string_pretty(&backup).context("Failed to serialize export")
    }

    pub async fn import_json(&self, json: &str) -> Result<()> {
        let backup: Backup =
            serde_json::from_str(json).context("Failed to parse backup document")?;
        self.db.import(&backup).await?;
        info!(
            "Imported {} meetings, {} transcripts, {} summaries, {} action items",
            backup.meetings.len(),
            backup.transcripts.len(),
            backup.summaries.len(),
            backup.action_items.len()
        );
        Ok(())
    }

    pub async fn dashboard(&self) -> Result<DashboardStats> {
        let meetings = self.db.meetings().await?;
        let action_items = self.db.action_items().await?;
        let summaries = self.db.summaries().await?;

        let one_month_ago = Utc::now()
            .checked_sub_months(Months::new(1))
            .unwrap_or_else(Utc::now);

        let recent: Vec<&Meeting> = meetings
            .iter()
            .filter(|m| m.started_at >= one_month_ago)
            .collect();

        let recorded_ms_this_month = recent.iter().map(|m| m.duration_ms).sum();
        let open_tasks = action_items
            .iter()
            .filter(|t| t.status != ActionStatus::Done)
            .count();

        let with_plan = summaries
            .iter()
            .filter(|s| !s.data.action_plan.is_empty())
            .count();
        let action_plan_pct = if summaries.is_empty() {
            0
        } else {
            (with_plan * 100 / summaries.len()) as u32
        };

        Ok(DashboardStats {
            meetings_this_month: recent.len(),
            recorded_ms_this_month,
            open_tasks,
            action_plan_pct,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewMeeting, TranscriptSource};

    fn test_app() -> App {
        App::new(Config::default(), Database::open_in_memory().unwrap())
    }

    fn recent_meeting(title: &str) -> NewMeeting {
        let now = Utc::now();
        NewMeeting {
            title: title.to_string(),
            started_at: now - chrono::Duration::minutes(30),
            ended_at: now,
            tags: vec![],
            audio_path: None,
        }
    }

    #[tokio::test]
    async fn test_summarize_rejects_empty_transcript() {
        let app = test_app();
        let meeting = app
            .db
            .save_recording(&recent_meeting("Muda"), "", TranscriptSource::Live)
            .await
            .unwrap();

        let err = app.summarize(meeting.id).await.unwrap_err();
        let root = err.root_cause().to_string();
        assert!(root.contains("transcript is empty"), "got: {root}");
    }

    #[tokio::test]
    async fn test_summarize_unknown_meeting() {
        let app = test_app();
        assert!(app.summarize(404).await.is_err());
    }

    #[tokio::test]
    async fn test_dashboard_counts() {
        let app = test_app();
        let meeting = app
            .db
            .save_recording(&recent_meeting("Semanal"), "hola", TranscriptSource::Live)
            .await
            .unwrap();

        let stats = app.dashboard().await.unwrap();
        assert_eq!(stats.meetings_this_month, 1);
        assert_eq!(stats.recorded_ms_this_month, meeting.duration_ms);
        assert_eq!(stats.open_tasks, 0);
        assert_eq!(stats.action_plan_pct, 0);
    }

    #[tokio::test]
    async fn test_export_import_json_round_trip() {
        let app = test_app();
        app.db
            .save_recording(&recent_meeting("Exportada"), "texto", TranscriptSource::Live)
            .await
            .unwrap();

        let json = app.export_json().await.unwrap();

        let other = test_app();
        other.import_json(&json).await.unwrap();
        let meetings = other.db.meetings().await.unwrap();
        assert_eq!(meetings.len(), 1);
        assert_eq!(meetings[0].title, "Exportada");
    }
}
