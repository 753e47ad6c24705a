//! CLI handler for the summarize command.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::app::App;
use crate::cli::args::SummarizeCliArgs;
use crate::summarize::MeetingMinutes;

pub async fn handle_summarize_command(app: &App, args: SummarizeCliArgs) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message("Generating minutes...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = app.summarize(args.id).await;
    spinner.finish_and_clear();

    let (meeting, minutes) = result?;

    println!(
        "Meeting {} is now {}. Minutes:",
        meeting.id,
        meeting.status.as_str()
    );
    println!();
    print_minutes(&minutes);

    Ok(())
}

pub fn print_minutes(minutes: &MeetingMinutes) {
    println!("{} ({}, {})", minutes.title, minutes.date, minutes.time_range);

    println!("\nResumen general:\n{}", minutes.executive_summary);
    println!("\nObjetivo general:\n{}", minutes.objective);

    if !minutes.key_points.is_empty() {
        println!("\nPuntos relevantes:");
        for point in &minutes.key_points {
            println!("  - {}", point);
        }
    }

    if !minutes.participants.is_empty() {
        println!("\nDesarrollo por participante:");
        for participant in &minutes.participants {
            println!("  {}: {}", participant.name, participant.contribution);
        }
    }

    if !minutes.action_plan.is_empty() {
        println!("\nPlan de acción:");
        for entry in &minutes.action_plan {
            println!(
                "  - {} ({}, {}, {})",
                entry.task, entry.assignee, entry.due_date, entry.priority
            );
        }
    }

    if !minutes.topics.is_empty() {
        println!("\nTemas: {}", minutes.topics.join(", "));
    }
}
