use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "minuta")]
#[command(about = "Local-first meeting recorder with AI minutes", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Record a meeting (stops on Enter)
    Record(RecordCliArgs),
    /// List saved meetings
    List(ListCliArgs),
    /// Show one meeting with its transcript, minutes and tasks
    Show(ShowCliArgs),
    /// View or edit a meeting's transcript
    Transcript(TranscriptCliArgs),
    /// Generate structured minutes for a meeting
    Summarize(SummarizeCliArgs),
    /// List action items extracted from minutes
    Tasks(TasksCliArgs),
    /// Delete a meeting and everything derived from it
    Delete(DeleteCliArgs),
    /// Export all data as a single JSON document (audio excluded)
    Export(ExportCliArgs),
    /// Replace all data with a previously exported document
    Import(ImportCliArgs),
    /// Show aggregate figures for the last month
    Dashboard,
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug)]
pub struct RecordCliArgs {
    /// Title for the new meeting
    #[arg(short, long)]
    pub title: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct ListCliArgs {
    /// Maximum number of meetings to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

#[derive(ClapArgs, Debug)]
pub struct ShowCliArgs {
    /// Meeting id
    pub id: i64,
}

#[derive(ClapArgs, Debug)]
pub struct TranscriptCliArgs {
    #[command(subcommand)]
    pub command: TranscriptCommand,
}

#[derive(Subcommand, Debug)]
pub enum TranscriptCommand {
    /// Print the transcript text
    Show { id: i64 },
    /// Overwrite the transcript with new text
    Edit {
        id: i64,
        /// New transcript text
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,
        /// Read the new transcript from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(ClapArgs, Debug)]
pub struct SummarizeCliArgs {
    /// Meeting id
    pub id: i64,
}

#[derive(ClapArgs, Debug)]
pub struct TasksCliArgs {
    /// Only tasks for this meeting
    #[arg(short, long)]
    pub meeting: Option<i64>,
    /// Include finished tasks
    #[arg(long)]
    pub all: bool,
}

#[derive(ClapArgs, Debug)]
pub struct DeleteCliArgs {
    /// Meeting id
    pub id: i64,
}

#[derive(ClapArgs, Debug)]
pub struct ExportCliArgs {
    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct ImportCliArgs {
    /// Backup document to import
    pub path: PathBuf,
}
