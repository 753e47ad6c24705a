//! Meeting recording and lifecycle.
//!
//! Captures microphone audio with an optional parallel live-recognition
//! resource, and owns the status machine a saved meeting moves through.

pub mod session;
pub mod status;

pub use session::{RecordingOutcome, RecordingSession, SessionPhase, SessionStatusHandle};
pub use status::MeetingStatus;
