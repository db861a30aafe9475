//! translator - translate documents with a crew of specialised agents.

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod error;

use cli::{Cli, Command};
use commands::App;
use config::Settings;
use error::CliError;
use translator_runtime::StdinFeedback;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "translator=debug" } else { "translator=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = Settings::from(cli.global);
    debug!(?settings.backend, config_dir = %settings.config_dir.display(), "Loaded settings");

    let backend = settings.build_backend()?;
    let app = App::new(settings, backend);

    match cli.command {
        Command::Translate(args) => {
            app.translate(&args).await?;
        }
        Command::Batch(args) => {
            app.batch(&args).await?;
        }
        Command::Train(args) => {
            app.train(&args, &mut StdinFeedback::new()).await?;
        }
        Command::Replay { task_id } => {
            app.replay(&task_id).await?;
        }
        Command::LogTasksOutputs => {
            app.log_tasks_outputs()?;
        }
    }
    Ok(())
}
