//! CLI handlers for meeting listing, detail, deletion and the dashboard.

use anyhow::Result;

use crate::app::App;
use crate::cli::args::{DeleteCliArgs, ListCliArgs, ShowCliArgs};

pub async fn handle_list_command(app: &App, args: ListCliArgs) -> Result<()> {
    let meetings = app.db.list_meetings(args.limit).await?;

    if meetings.is_empty() {
        println!("No meetings yet. Record one with: minuta record");
        return Ok(());
    }

    for meeting in meetings {
        let tags = if meeting.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", meeting.tags.join(", "))
        };
        println!(
            "{:>4}  {}  {:<11}  {:>8}  {}{}",
            meeting.id,
            meeting.started_at.format("%Y-%m-%d %H:%M"),
            meeting.status.as_str(),
            super::format_duration_ms(meeting.duration_ms),
            meeting.title,
            tags,
        );
    }

    Ok(())
}

pub async fn handle_show_command(app: &App, args: ShowCliArgs) -> Result<()> {
    let Some(meeting) = app.db.meeting(args.id).await? else {
        anyhow::bail!("Meeting {} not found", args.id);
    };

    println!("Meeting {}: {}", meeting.id, meeting.title);
    println!("  Status:   {}", meeting.status.as_str());
    println!(
        "  When:     {} ({})",
        meeting.started_at.format("%Y-%m-%d %H:%M"),
        super::format_duration_ms(meeting.duration_ms)
    );
    if !meeting.tags.is_empty() {
        println!("  Tags:     {}", meeting.tags.join(", "));
    }
    if let Some(path) = &meeting.audio_path {
        println!("  Audio:    {}", path);
    }

    match app.db.transcript(args.id).await? {
        Some(transcript) => {
            println!(
                "\nTranscript ({}, updated {}):",
                transcript.source.as_str(),
                transcript.updated_at.format("%Y-%m-%d %H:%M")
            );
            println!("{}", transcript.text);
        }
        None => println!("\nNo transcript yet."),
    }

    if let Some(summary) = app.db.summary(args.id).await? {
        println!();
        super::summarize::print_minutes(&summary.data);
    }

    let items = app.db.action_items_for(args.id).await?;
    if !items.is_empty() {
        println!("\nAction items:");
        for item in items {
            super::tasks::print_task(&item);
        }
    }

    Ok(())
}

pub async fn handle_delete_command(app: &App, args: DeleteCliArgs) -> Result<()> {
    if app.delete_meeting(args.id).await? {
        println!("Meeting {} deleted (transcript, minutes and tasks included).", args.id);
    } else {
        println!("Meeting {} does not exist.", args.id);
    }
    Ok(())
}

pub async fn handle_dashboard_command(app: &App) -> Result<()> {
    let stats = app.dashboard().await?;

    println!("Last month:");
    println!("  Meetings:        {}", stats.meetings_this_month);
    println!(
        "  Recorded time:   {}",
        super::format_duration_ms(stats.recorded_ms_this_month)
    );
    println!("  Open tasks:      {}", stats.open_tasks);
    println!("  With plan:       {}%", stats.action_plan_pct);

    Ok(())
}
