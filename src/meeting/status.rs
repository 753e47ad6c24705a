//! Meeting status types and transition rules.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a saved meeting.
///
/// Ordered by progress: a meeting never moves back to an earlier status
/// except by being deleted outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Recorded,
    Transcribed,
    Summarized,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recorded => "recorded",
            Self::Transcribed => "transcribed",
            Self::Summarized => "summarized",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "recorded" => Some(Self::Recorded),
            "transcribed" => Some(Self::Transcribed),
            "summarized" => Some(Self::Summarized),
            _ => None,
        }
    }

    /// Status after a transcript save.
    ///
    /// A non-empty transcript advances `Recorded` to `Transcribed`; saving
    /// again, or saving while already further along, changes nothing.
    pub fn after_transcript(self, text: &str) -> Self {
        if self == Self::Recorded && !text.trim().is_empty() {
            Self::Transcribed
        } else {
            self
        }
    }

    /// Status after a successful summarization. Unconditional.
    pub fn after_summary(self) -> Self {
        Self::Summarized
    }
}
