//! CLI handler for transcript viewing and manual edits.

use anyhow::{bail, Context, Result};

use crate::app::App;
use crate::cli::args::{TranscriptCliArgs, TranscriptCommand};

pub async fn handle_transcript_command(app: &App, args: TranscriptCliArgs) -> Result<()> {
    match args.command {
        TranscriptCommand::Show { id } => match app.db.transcript(id).await? {
            Some(transcript) => {
                println!("{}", transcript.text);
                Ok(())
            }
            None => bail!("Meeting {} has no transcript yet", id),
        },
        TranscriptCommand::Edit { id, text, file } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {:?}", path))?,
                (None, None) => bail!("Provide the new text with --text or --file"),
            };

            let meeting = app.save_transcript(id, &text).await?;
            println!(
                "Transcript saved ({} chars). Meeting {} is now {}.",
                text.chars().count(),
                meeting.id,
                meeting.status.as_str()
            );
            Ok(())
        }
    }
}
