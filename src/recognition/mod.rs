//! Live speech recognition for the recording session.
//!
//! A recognizer consumes the capture's live audio feed and emits interim and
//! final text segments. Runs may end on their own (a pause in speech, an
//! upstream flush); the recording session restarts them while it is active
//! and accumulates final text across runs.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

pub mod chunked;

pub use chunked::ChunkedApiRecognizer;

use crate::config::RecognizerConfig;

/// Live audio chunks teed from the capture.
pub type AudioFeed = mpsc::UnboundedReceiver<Vec<f32>>;

#[derive(Debug)]
pub enum RecognizerEvent {
    /// A piece of recognized text. Interim segments are display-only and are
    /// never persisted; final segments are appended to the transcript in
    /// arrival order.
    Segment { text: String, is_final: bool },
    /// The current run finished. The session restarts recognition while it is
    /// still recording.
    Ended,
    Error(RecognizerError),
}

#[derive(Debug, Error)]
pub enum RecognizerError {
    /// A chunk contained no recognizable speech.
    #[error("no speech detected")]
    NoSpeech,

    /// Transient audio-capture hiccup.
    #[error("audio capture hiccup: {0}")]
    AudioHiccup(String),

    #[error("recognition transport failure: {0}")]
    Transport(String),

    #[error("recognizer misconfigured: {0}")]
    Config(String),
}

impl RecognizerError {
    /// Benign errors do not stop the session; recognition simply carries on.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::NoSpeech | Self::AudioHiccup(_))
    }
}

#[async_trait]
pub trait SpeechRecognizer: Send {
    /// Begin one recognition run over the given audio feed. Events flow on
    /// the returned channel until `Ended`.
    async fn start(
        &mut self,
        language: &str,
        audio: AudioFeed,
    ) -> Result<mpsc::UnboundedReceiver<RecognizerEvent>, RecognizerError>;
}

/// Build the configured recognizer. `Ok(None)` means the capability is not
/// present and recording proceeds audio-only (degraded, not an error).
pub fn build(
    config: &RecognizerConfig,
    sample_rate: u32,
) -> Result<Option<Box<dyn SpeechRecognizer>>, RecognizerError> {
    match config.provider.as_deref() {
        None | Some("") | Some("none") => Ok(None),
        Some("chunked-api") => {
            let endpoint = config.api_endpoint.clone().ok_or_else(|| {
                RecognizerError::Config(
                    "api_endpoint is required for the chunked-api provider".to_string(),
                )
            })?;
            Ok(Some(Box::new(ChunkedApiRecognizer::new(
                endpoint,
                config.api_key.clone(),
                config.chunk_seconds,
                sample_rate,
            ))))
        }
        Some(other) => Err(RecognizerError::Config(format!(
            "Unknown recognition provider '{}'. Supported providers: chunked-api, none",
            other
        ))),
    }
}
