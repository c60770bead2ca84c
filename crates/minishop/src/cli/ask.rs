use crate::cli::ux::{PendingSpinner, TerminalRenderer};
use crate::svc::chat::Chat;
use anyhow::{Context, Result, bail};
use minishop_core::config::Config;
use std::io::stdout;

/// Sends one message and prints the assistant reply with its product cards.
pub async fn execute(message: &str, config: &Config) -> Result<()> {
    let chat = Chat::new(config).context("Failed to initialize chat service")?;
    let mut stdout = stdout();
    let mut renderer = TerminalRenderer::new(&mut stdout);
    ask(chat, message, &mut renderer).await
}

async fn ask(mut chat: Chat, message: &str, renderer: &mut TerminalRenderer<'_>) -> Result<()> {
    // Only the reply is printed; the greeting and the echo are skipped
    chat.take_unrendered();

    let spinner = PendingSpinner::new("Thinking...".to_string());
    let sent = chat.send(message).await;
    spinner.clear();
    if !sent {
        bail!("Nothing to send, the message is empty");
    }

    match chat.take_unrendered().last() {
        Some(reply) => renderer.render_message(reply),
        None => Ok(()),
    }
}
