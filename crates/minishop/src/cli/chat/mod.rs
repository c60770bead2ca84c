use crate::cli::ux::TerminalRenderer;
use crate::svc::chat::Chat;
use anyhow::{Context, Result};
use minishop_core::config::Config;
use std::io::stdout;
use std::sync::Arc;
use tokio::sync::Mutex;

mod repl;

/// Executes the chat command, starting an interactive REPL session.
pub async fn execute(config: &Config) -> Result<()> {
    let chat = Chat::new(config).context("Failed to initialize chat service")?;
    let mut stdout = stdout();
    let mut renderer = TerminalRenderer::new(&mut stdout);
    repl::run(Arc::new(Mutex::new(chat)), &mut renderer).await
}
