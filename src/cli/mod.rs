//! Command-line interface.

pub mod args;
pub mod export;
pub mod meetings;
pub mod record;
pub mod summarize;
pub mod tasks;
pub mod transcript;

pub use args::{Cli, CliCommand};
pub use export::{handle_export_command, handle_import_command};
pub use meetings::{
    handle_dashboard_command, handle_delete_command, handle_list_command, handle_show_command,
};
pub use record::handle_record_command;
pub use summarize::handle_summarize_command;
pub use tasks::handle_tasks_command;
pub use transcript::handle_transcript_command;

/// Formats a millisecond duration as `MM:SS` or `HH:MM:SS`.
pub fn format_duration_ms(ms: i64) -> String {
    let total_seconds = (ms / 1000).max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
