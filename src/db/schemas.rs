//! Record types for the four stored kinds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::meeting::status::MeetingStatus;
use crate::summarize::minutes::MeetingMinutes;

/// A meeting record: one recorded session plus metadata.
///
/// Audio bytes live on disk; the record only carries the artifact path, which
/// is stripped from exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: i64,
    pub title: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Derived as `ended_at - started_at`, stored for cheap listing.
    pub duration_ms: i64,
    pub tags: Vec<String>,
    pub status: MeetingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// New meeting data before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewMeeting {
    pub title: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub audio_path: Option<String>,
}

impl NewMeeting {
    pub fn duration_ms(&self) -> i64 {
        (self.ended_at - self.started_at).num_milliseconds().max(0)
    }
}

/// Where transcript text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptSource {
    Live,
    Manual,
}

impl TranscriptSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Manual => "manual",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "live" => Some(Self::Live),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }
}

/// Transcript text for a meeting, one-to-one and overwritten on save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub meeting_id: i64,
    pub text: String,
    pub source: TranscriptSource,
    pub updated_at: DateTime<Utc>,
}

/// Structured minutes returned by the summarizer, one-to-one with a meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub meeting_id: i64,
    pub data: MeetingMinutes,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Parses stored labels and the Spanish wire values the summarizer emits.
    /// Unknown values fall back to `Medium`.
    pub fn parse(s: &str) -> Self {
        match s {
            "High" | "Alta" => Self::High,
            "Low" | "Baja" => Self::Low,
            _ => Self::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionStatus {
    Pending,
    InProgress,
    Done,
}

impl ActionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In-progress",
            Self::Done => "Done",
        }
    }

    /// Unknown values fall back to `Pending`.
    pub fn parse(s: &str) -> Self {
        match s {
            "In-progress" | "En curso" => Self::InProgress,
            "Done" | "Hecha" => Self::Done,
            _ => Self::Pending,
        }
    }
}

/// A task extracted from a meeting's minutes. The full per-meeting set is
/// replaced on every successful summarization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionItem {
    pub id: i64,
    pub meeting_id: i64,
    pub title: String,
    pub assignee: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub priority: Priority,
    pub status: ActionStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_source_round_trip() {
        assert_eq!(TranscriptSource::parse("live"), Some(TranscriptSource::Live));
        assert_eq!(
            TranscriptSource::parse("manual"),
            Some(TranscriptSource::Manual)
        );
        assert_eq!(TranscriptSource::parse("none"), None);
    }

    #[test]
    fn test_priority_accepts_spanish_wire_values() {
        assert_eq!(Priority::parse("Alta"), Priority::High);
        assert_eq!(Priority::parse("Media"), Priority::Medium);
        assert_eq!(Priority::parse("Baja"), Priority::Low);
        assert_eq!(Priority::parse("High"), Priority::High);
        assert_eq!(Priority::parse("???"), Priority::Medium);
    }

    #[test]
    fn test_action_status_accepts_spanish_wire_values() {
        assert_eq!(ActionStatus::parse("Pendiente"), ActionStatus::Pending);
        assert_eq!(ActionStatus::parse("En curso"), ActionStatus::InProgress);
        assert_eq!(ActionStatus::parse("Hecha"), ActionStatus::Done);
        assert_eq!(ActionStatus::parse(""), ActionStatus::Pending);
    }

    #[test]
    fn test_new_meeting_duration() {
        let started = "2024-01-01T10:00:00Z".parse().unwrap();
        let ended = "2024-01-01T10:30:00Z".parse().unwrap();
        let m = NewMeeting {
            title: "Revisión".to_string(),
            started_at: started,
            ended_at: ended,
            tags: vec![],
            audio_path: None,
        };
        assert_eq!(m.duration_ms(), 30 * 60 * 1000);
    }
}
