//! minishop cli definition and entrypoint.
mod ask;
mod chat;
pub mod ux;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use minishop_core::config::get_config;

use crate::log::setup_logging;

/// minishop - chat with the MiniGPT-Shop shopping assistant.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Show verbose logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file. Defaults to the user config directory.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Chat with the shopping assistant (default).
    Chat,
    /// Send a single message and print the reply.
    Ask {
        /// Message to send.
        #[arg(required = true)]
        message: Vec<String>,
    },
}

/// Runs the main CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        setup_logging().context("Failed to set up logging")?;
    }

    let config = get_config(cli.config.clone()).context("Failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => chat::execute(&config).await,
        Commands::Ask { message } => ask::execute(&message.join(" "), &config).await,
    }
}
