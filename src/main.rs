use anyhow::Result;
use clap::Parser;
use minuta::{
    app::App,
    cli::{
        handle_dashboard_command, handle_delete_command, handle_export_command,
        handle_import_command, handle_list_command, handle_record_command, handle_show_command,
        handle_summarize_command, handle_tasks_command, handle_transcript_command, Cli, CliCommand,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        CliCommand::Version => {
            println!("minuta {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        command => {
            let app = App::bootstrap()?;
            match command {
                CliCommand::Record(args) => handle_record_command(&app, args).await,
                CliCommand::List(args) => handle_list_command(&app, args).await,
                CliCommand::Show(args) => handle_show_command(&app, args).await,
                CliCommand::Transcript(args) => handle_transcript_command(&app, args).await,
                CliCommand::Summarize(args) => handle_summarize_command(&app, args).await,
                CliCommand::Tasks(args) => handle_tasks_command(&app, args).await,
                CliCommand::Delete(args) => handle_delete_command(&app, args).await,
                CliCommand::Export(args) => handle_export_command(&app, args).await,
                CliCommand::Import(args) => handle_import_command(&app, args).await,
                CliCommand::Dashboard => handle_dashboard_command(&app).await,
                CliCommand::Version => unreachable!(),
            }
        }
    }
}
