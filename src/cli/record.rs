//! CLI handler for the record command.

use anyhow::{Context, Result};
use tokio::io::AsyncBufReadExt;

use crate::app::App;
use crate::audio::MicCapture;
use crate::cli::args::RecordCliArgs;
use crate::db::{NewMeeting, TranscriptSource};
use crate::global;
use crate::meeting::{RecordingSession, SessionStatusHandle};
use crate::recognition;

pub async fn handle_record_command(app: &App, args: RecordCliArgs) -> Result<()> {
    let sample_rate = app.config.recording.sample_rate;

    let capture = MicCapture::new(sample_rate).context("Could not open the microphone")?;
    let recognizer = recognition::build(&app.config.recognizer, sample_rate)
        .context("Invalid recognizer configuration")?;

    let mut session = RecordingSession::new(
        Box::new(capture),
        recognizer,
        &app.config.recognizer.language,
        global::recordings_dir()?,
        SessionStatusHandle::default(),
    );

    let title = args.title.unwrap_or_else(|| {
        format!(
            "Grabación - {}",
            chrono::Local::now().format("%d/%m/%Y %H:%M")
        )
    });

    let start = session.start(&title).await?;
    if start.degraded {
        println!("Live transcription is not configured; recording audio only.");
    }
    println!("Recording '{}' — press Enter to stop.", title);

    let mut line = String::new();
    tokio::io::BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to wait for input")?;

    println!("Finalizing...");
    let outcome = session.stop().await?;

    let meeting = app
        .db
        .save_recording(
            &NewMeeting {
                title: outcome.title.clone(),
                started_at: outcome.started_at,
                ended_at: outcome.ended_at,
                tags: Vec::new(),
                audio_path: outcome
                    .audio_path
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            },
            &outcome.transcript,
            TranscriptSource::Live,
        )
        .await?;

    println!(
        "Meeting {} saved ({}, status: {})",
        meeting.id,
        super::format_duration_ms(meeting.duration_ms),
        meeting.status.as_str()
    );
    if let Some(path) = &meeting.audio_path {
        println!("Audio: {}", path);
    }
    if outcome.transcript.trim().is_empty() {
        println!("No live transcript captured. Edit one with: minuta transcript edit {}", meeting.id);
    } else {
        println!(
            "Live transcript: {} chars. Summarize with: minuta summarize {}",
            outcome.transcript.chars().count(),
            meeting.id
        );
    }

    Ok(())
}
