//! CLI handler for listing action items.

use anyhow::Result;

use crate::app::App;
use crate::cli::args::TasksCliArgs;
use crate::db::{ActionItem, ActionStatus};

pub async fn handle_tasks_command(app: &App, args: TasksCliArgs) -> Result<()> {
    let items = match args.meeting {
        Some(meeting_id) => app.db.action_items_for(meeting_id).await?,
        None => app.db.action_items().await?,
    };

    let mut shown = 0;
    for item in &items {
        if !args.all && item.status == ActionStatus::Done {
            continue;
        }
        print_task(item);
        shown += 1;
    }

    if shown == 0 {
        println!("No open tasks.");
    }

    Ok(())
}

pub fn print_task(item: &ActionItem) {
    let due = item.due_date.as_deref().unwrap_or("Por definir");
    println!(
        "  #{} [meeting {}] {} — {} (due: {}, {}, {})",
        item.id,
        item.meeting_id,
        item.title,
        item.assignee,
        due,
        item.priority.as_str(),
        item.status.as_str(),
    );
}
