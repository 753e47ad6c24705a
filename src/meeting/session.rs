//! One recording session: audio capture plus parallel live recognition.
//!
//! The session tees the capture's chunk feed into the recognizer and
//! accumulates final segments in arrival order. Recognition runs that end
//! while the session is still recording are restarted immediately, keeping
//! the text gathered so far; benign recognition errors never stop anything.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::audio::AudioCapture;
use crate::recognition::{AudioFeed, RecognizerEvent, SpeechRecognizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Recording,
    Finalizing,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Finalizing => "finalizing",
        }
    }
}

/// Live session state, readable by the CLI while recording.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub title: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    /// Live recognition is unavailable; recording is audio-only.
    pub degraded: bool,
    /// Latest interim segment. Display-only, never persisted.
    pub interim: String,
    pub transcript_chars: usize,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Idle,
            title: None,
            started_at: None,
            degraded: false,
            interim: String::new(),
            transcript_chars: 0,
        }
    }
}

impl SessionState {
    pub fn duration_seconds(&self) -> Option<u64> {
        self.started_at.map(|started| {
            let elapsed = Utc::now() - started;
            elapsed.num_seconds().max(0) as u64
        })
    }
}

#[derive(Clone, Default)]
pub struct SessionStatusHandle {
    inner: Arc<Mutex<SessionState>>,
}

impl SessionStatusHandle {
    pub async fn get(&self) -> SessionState {
        self.inner.lock().await.clone()
    }

    pub async fn start_recording(
        &self,
        title: Option<String>,
        started_at: DateTime<Utc>,
        degraded: bool,
    ) {
        let mut state = self.inner.lock().await;
        *state = SessionState {
            phase: SessionPhase::Recording,
            title,
            started_at: Some(started_at),
            degraded,
            ..SessionState::default()
        };
    }

    pub async fn set_phase(&self, phase: SessionPhase) {
        self.inner.lock().await.phase = phase;
    }

    pub async fn set_interim(&self, text: String) {
        self.inner.lock().await.interim = text;
    }

    pub async fn note_final_segment(&self, transcript_chars: usize) {
        let mut state = self.inner.lock().await;
        state.transcript_chars = transcript_chars;
        state.interim.clear();
    }

    pub async fn reset(&self) {
        *self.inner.lock().await = SessionState::default();
    }
}

/// Everything a finished session hands over for persistence.
#[derive(Debug)]
pub struct RecordingOutcome {
    pub title: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub audio_path: Option<PathBuf>,
    /// Concatenated final segments, arrival order. Empty when recognition was
    /// unavailable or heard nothing.
    pub transcript: String,
    pub degraded: bool,
}

/// Outcome of starting a session.
#[derive(Debug)]
pub struct SessionStart {
    pub started_at: DateTime<Utc>,
    /// True when no recognizer is configured: recording is audio-only.
    pub degraded: bool,
}

pub struct RecordingSession {
    capture: Box<dyn AudioCapture>,
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    language: String,
    recordings_dir: PathBuf,
    status: SessionStatusHandle,
    run: Option<JoinHandle<String>>,
    title: String,
    started_at: Option<DateTime<Utc>>,
    degraded: bool,
}

impl RecordingSession {
    pub fn new(
        capture: Box<dyn AudioCapture>,
        recognizer: Option<Box<dyn SpeechRecognizer>>,
        language: &str,
        recordings_dir: PathBuf,
        status: SessionStatusHandle,
    ) -> Self {
        Self {
            capture,
            recognizer,
            language: language.to_string(),
            recordings_dir,
            status,
            run: None,
            title: String::new(),
            started_at: None,
            degraded: false,
        }
    }

    /// Start recording. A capture failure (permission denied, no device)
    /// aborts the start and leaves no partial state. A missing recognizer is
    /// a degraded condition, not an error: recording proceeds audio-only and
    /// the flag is reported exactly once, here.
    pub async fn start(&mut self, title: &str) -> Result<SessionStart> {
        if self.started_at.is_some() {
            bail!("Recording already in progress");
        }

        self.capture.start()?;

        let started_at = Utc::now();
        let recognizer = self.recognizer.take();
        let degraded = recognizer.is_none();

        if let Some(recognizer) = recognizer {
            match self.capture.take_chunks() {
                Some(chunks) => {
                    let language = self.language.clone();
                    let status = self.status.clone();
                    self.run = Some(tokio::spawn(run_recognition(
                        recognizer, chunks, language, status,
                    )));
                }
                None => {
                    warn!("Capture exposes no live feed; recording audio-only");
                }
            }
        } else {
            warn!("Live recognition unavailable, recording audio-only");
        }

        self.title = title.to_string();
        self.started_at = Some(started_at);
        self.degraded = degraded;
        self.status
            .start_recording(Some(title.to_string()), started_at, degraded)
            .await;

        info!("Recording session started: {}", title);
        Ok(SessionStart {
            started_at,
            degraded,
        })
    }

    /// Stop both resources, finalize the audio artifact, and hand back the
    /// assembled outcome for persistence.
    pub async fn stop(&mut self) -> Result<RecordingOutcome> {
        let Some(started_at) = self.started_at.take() else {
            bail!("No recording in progress");
        };

        self.status.set_phase(SessionPhase::Finalizing).await;

        // Stopping the capture closes the chunk feed, which makes the
        // recognizer flush and end its final run.
        let samples = self.capture.stop()?;
        let sample_rate = self.capture.sample_rate();

        let transcript = match self.run.take() {
            Some(handle) => handle.await.context("Recognition task panicked")?,
            None => String::new(),
        };

        let ended_at = Utc::now();

        let audio_path = if samples.is_empty() {
            debug!("No audio captured; skipping artifact");
            None
        } else {
            let path = self.generate_audio_path(started_at);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create recordings directory")?;
            }
            crate::audio::write_wav(&path, &samples, sample_rate)?;
            Some(path)
        };

        self.status.reset().await;

        info!(
            "Recording session stopped: {} chars of live transcript",
            transcript.chars().count()
        );

        Ok(RecordingOutcome {
            title: self.title.clone(),
            started_at,
            ended_at,
            audio_path,
            transcript,
            degraded: self.degraded,
        })
    }

    fn generate_audio_path(&self, started_at: DateTime<Utc>) -> PathBuf {
        let timestamp = started_at.format("%Y%m%d-%H%M%S");
        let filename = format!("meeting-{}.wav", timestamp);
        let path = self.recordings_dir.join(&filename);

        // Handle collision by appending counter
        if path.exists() {
            for i in 1..100 {
                let filename = format!("meeting-{}-{}.wav", timestamp, i);
                let alt_path = self.recordings_dir.join(&filename);
                if !alt_path.exists() {
                    return alt_path;
                }
            }
        }

        path
    }
}

/// Drives recognition runs for the lifetime of one session.
///
/// Final segments accumulate across run restarts; a run that ends while the
/// feed is still open is reacquired immediately. Benign errors are logged and
/// ignored; anything else abandons recognition but never the recording.
async fn run_recognition(
    mut recognizer: Box<dyn SpeechRecognizer>,
    mut chunks: AudioFeed,
    language: String,
    status: SessionStatusHandle,
) -> String {
    let mut transcript = String::new();
    let mut feed_open = true;

    'runs: loop {
        let (feed_tx, feed_rx) = tokio::sync::mpsc::unbounded_channel();
        let mut events = match recognizer.start(&language, feed_rx).await {
            Ok(events) => events,
            Err(e) => {
                warn!("Failed to start recognition run: {}", e);
                break 'runs;
            }
        };
        let mut feed_tx = Some(feed_tx);

        loop {
            tokio::select! {
                chunk = chunks.recv(), if feed_tx.is_some() => {
                    match chunk {
                        Some(chunk) => {
                            if let Some(tx) = &feed_tx {
                                let _ = tx.send(chunk);
                            }
                        }
                        None => {
                            // Capture stopped: drop the feed so the run
                            // flushes, then drain its remaining events.
                            feed_open = false;
                            feed_tx = None;
                        }
                    }
                }
                event = events.recv() => {
                    match event {
                        Some(RecognizerEvent::Segment { text, is_final: true }) => {
                            let text = text.trim();
                            if !text.is_empty() {
                                if !transcript.is_empty() {
                                    transcript.push(' ');
                                }
                                transcript.push_str(text);
                                status.note_final_segment(transcript.chars().count()).await;
                            }
                        }
                        Some(RecognizerEvent::Segment { text, is_final: false }) => {
                            status.set_interim(text).await;
                        }
                        Some(RecognizerEvent::Error(e)) if e.is_benign() => {
                            debug!("Benign recognition interruption: {}", e);
                        }
                        Some(RecognizerEvent::Error(e)) => {
                            warn!("Recognition failed, continuing audio-only: {}", e);
                            break 'runs;
                        }
                        Some(RecognizerEvent::Ended) | None => {
                            if feed_open {
                                debug!("Recognition run ended early, restarting");
                                continue 'runs;
                            }
                            break 'runs;
                        }
                    }
                }
            }
        }
    }

    transcript
}
