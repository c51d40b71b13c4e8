mod cli;
mod commands;

use std::io::IsTerminal;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Set up Ctrl+C handler for graceful interruption
    ctrlc::set_handler(|| {
        eprintln!("\n\nInterrupted by user (Ctrl+C)");
        std::process::exit(130); // Standard exit code for SIGINT
    })
    .context("Failed to set Ctrl+C handler")?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config.as_deref();

    match &cli.command {
        Commands::Init { name, connection } => {
            commands::Init::execute(name, connection, config)
                .context("Failed to execute init command")?;
        }
        Commands::List { connection } => {
            commands::List::execute(connection, config)
                .context("Failed to execute list command")?;
        }
        Commands::Push {
            filenames,
            connection,
        } => {
            commands::Push::execute(filenames, connection, config)
                .context("Failed to execute push command")?;
        }
        Commands::Pull {
            filenames,
            connection,
        } => {
            commands::Pull::execute(filenames, connection, config)
                .context("Failed to execute pull command")?;
        }
        Commands::Checkout { connection } => {
            commands::Checkout::execute(connection, config)
                .context("Failed to execute checkout command")?;
        }
        Commands::Watch { connection } => {
            commands::Watch::execute(connection, config)
                .context("Failed to execute watch command")?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}
