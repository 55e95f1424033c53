//! alertgram binary entrypoint.

use std::process::ExitCode;

use clap::Parser;

use alertgram_cli::cli::{Cli, Commands};
use alertgram_cli::commands::{DaemonCommand, NotificationCommand};
use alertgram_cli::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_format);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "alertgram failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), alertgram_cli::CliError> {
    match cli.command {
        Commands::Notification(args) => {
            let cmd = NotificationCommand::new(args);
            cmd.execute().await?;
        }
        Commands::Daemon(args) => {
            let cmd = DaemonCommand::new(args);
            cmd.execute().await?;
        }
    }

    Ok(())
}
