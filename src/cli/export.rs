//! CLI handlers for backup export and import.

use anyhow::{Context, Result};

use crate::app::App;
use crate::cli::args::{ExportCliArgs, ImportCliArgs};

pub async fn handle_export_command(app: &App, args: ExportCliArgs) -> Result<()> {
    let json = app.export_json().await?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &json).with_context(|| format!("Failed to write {:?}", path))?;
            println!("Export written to {:?}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}

pub async fn handle_import_command(app: &App, args: ImportCliArgs) -> Result<()> {
    let json = std::fs::read_to_string(&args.path)
        .with_context(|| format!("Failed to read {:?}", args.path))?;

    app.import_json(&json).await?;
    println!("Import complete. Existing data was replaced.");

    Ok(())
}
