use crate::cli::ux::{ChatMessageType, PendingSpinner, TerminalRenderer, style_chat_text};
use crate::svc::chat::Chat;
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use minishop_core::get_data_dir;
use minishop_core::message::Message;
use rustyline::completion::{Candidate, Completer};
use rustyline::error::ReadlineError;
use rustyline::hint::Hinter;
use rustyline::history::History;
use rustyline::{
    Cmd, CompletionType, Editor, EventHandler, Helper, Highlighter, KeyCode, KeyEvent, Modifiers,
    Validator,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

const MAX_TRANSCRIPT_TEXT: usize = 500;

// -------------
// REPL commands
// -------------
#[derive(Parser, Debug)]
#[command(multicall = true)]
struct CliCommand {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Hash, PartialEq, Eq)]
enum Command {
    /// Show the conversation so far
    #[command(visible_alias = "log")]
    History,
    /// List the product catalog, optionally for one category
    Products {
        /// Category to show, e.g. smartphone
        category: Option<String>,
    },
    /// Show a single product card
    Product {
        /// Product id, e.g. phone_001
        id: String,
    },
    /// Check that the shop backend is reachable
    Status,
    /// Exit the chat session
    #[command(visible_aliases = ["q", "quit"])]
    Exit,
}

impl Command {
    /// Executes a REPL command.
    ///
    /// Returns `Ok(false)` if the REPL should exit.
    pub async fn execute(
        self,
        chat: Arc<Mutex<Chat>>,
        renderer: &mut TerminalRenderer<'_>,
    ) -> Result<bool> {
        match self {
            Command::History => {
                let chat_guard = chat.lock().await;
                renderer.render_text(&format_transcript(chat_guard.messages()))?;
            }
            Command::Products { category } => {
                let chat_guard = chat.lock().await;
                match chat_guard.products(category.as_deref()).await {
                    Ok(products) => renderer.render_products(&products)?,
                    Err(e) => print_error(&e),
                }
            }
            Command::Product { id } => {
                let chat_guard = chat.lock().await;
                match chat_guard.product(&id).await {
                    Ok(product) => renderer.render_products(std::slice::from_ref(&product))?,
                    Err(e) => print_error(&e),
                }
            }
            Command::Status => {
                let chat_guard = chat.lock().await;
                match chat_guard.status().await {
                    Ok(banner) => renderer.render_text(&banner)?,
                    Err(e) => print_error(&e),
                }
            }
            Command::Exit => {
                renderer.render_text("Bye!")?;
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn print_error(error: &anyhow::Error) {
    eprintln!(
        "{}",
        style_chat_text(&format!("{error:#}"), ChatMessageType::Error)
    );
}

// -------------
// REPL completion
// -------------
#[derive(Helper, Validator, Highlighter)]
struct Repl {
    pub command_names: Vec<String>,
}

#[derive(Debug)]
struct CompletionCandidate {
    text: String,
    display_string: String,
}

impl CompletionCandidate {
    pub fn new(text: &str) -> Self {
        let display_string = style_chat_text(text, ChatMessageType::Footer).to_string();
        Self {
            text: text.to_owned(),
            display_string,
        }
    }
}

impl Candidate for CompletionCandidate {
    fn display(&self) -> &str {
        &self.display_string
    }

    fn replacement(&self) -> &str {
        &self.text
    }
}

impl Completer for Repl {
    type Candidate = CompletionCandidate;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> Result<(usize, Vec<Self::Candidate>), ReadlineError> {
        // Only the command word itself is completed
        let line_to_pos = &line[..pos];
        if !line_to_pos.starts_with('/') || line_to_pos.contains(' ') {
            return Ok((0, Vec::new()));
        }

        let candidates = self
            .command_names
            .iter()
            .filter(|name| name.starts_with(line_to_pos))
            .map(|name| CompletionCandidate::new(name))
            .collect();

        Ok((0, candidates))
    }
}

impl Hinter for Repl {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
        if line.is_empty() || pos < line.len() {
            return None;
        }
        if line.starts_with('/') {
            self.command_names
                .iter()
                .find(|&cmd_name| cmd_name.starts_with(line))
                .map(|cmd_name| cmd_name[line.len()..].into())
        } else {
            None
        }
    }
}

fn command_names() -> Vec<String> {
    CliCommand::command()
        .get_subcommands()
        .flat_map(|c| c.get_name_and_visible_aliases())
        .map(|s| format!("/{s}"))
        .collect()
}

/// Enter submits the line; Alt+Enter keeps editing on a new line.
fn bind_keys<H: Helper, I: History>(rl: &mut Editor<H, I>) {
    rl.bind_sequence(
        KeyEvent(KeyCode::Enter, Modifiers::ALT),
        EventHandler::Simple(Cmd::Newline),
    );
}

fn history_path() -> Option<PathBuf> {
    get_data_dir().ok().map(|dir| dir.join("history.txt"))
}

/// Runs the interactive REPL for the chat session.
pub async fn run(chat: Arc<Mutex<Chat>>, renderer: &mut TerminalRenderer<'_>) -> Result<()> {
    {
        let mut chat_guard = chat.lock().await;
        println!("Welcome to MiniGPT-Shop! Connected to {}.", chat_guard.endpoint());
        println!(
            "{}",
            style_chat_text(
                "Type '/help' for commands, '/q' to exit. Alt+Enter inserts a newline.",
                ChatMessageType::Footer
            )
        );
        println!(
            "{}",
            style_chat_text(
                "Try: \"I'm looking for a smartphone with a good camera under €400\"",
                ChatMessageType::Footer
            )
        );
        renderer.render_messages(chat_guard.take_unrendered())?;
    }

    let config = rustyline::Config::builder()
        .history_ignore_dups(true)?
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(Repl {
        command_names: command_names(),
    }));
    bind_keys(&mut rl);

    let history_file = history_path();
    if let Some(path) = &history_file {
        if let Err(e) = rl.load_history(path) {
            debug!("No readline history loaded from {}: {e}", path.display());
        }
    }

    let prompt = format!("\n{}", style_chat_text("> ", ChatMessageType::Prompt));
    let result = loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed_line = line.trim();
                if trimmed_line.is_empty() {
                    continue;
                }
                rl.add_history_entry(&line)?;

                if trimmed_line.starts_with('/') {
                    let args = shlex::split(trimmed_line).unwrap_or_default();
                    match CliCommand::try_parse_from(args) {
                        Ok(cli_command) => {
                            if !cli_command.command.execute(chat.clone(), renderer).await? {
                                break Ok(());
                            }
                        }
                        Err(e) => {
                            e.print()?;
                        }
                    }
                } else if let Err(e) = process_message(chat.clone(), renderer, &line).await {
                    break Err(e);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Type /quit to exit.");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nBye!");
                break Ok(());
            }
            Err(err) => break Err(err.into()),
        }
    };

    if let Some(path) = &history_file {
        if let Err(e) = rl.save_history(path) {
            debug!("Failed to save readline history to {}: {e}", path.display());
        }
    }
    result
}

/// Sends one user message and renders the exchange.
///
/// The user message is rendered before the request goes out; the reply (or
/// the fallback) is rendered once the request settles.
async fn process_message(
    chat: Arc<Mutex<Chat>>,
    renderer: &mut TerminalRenderer<'_>,
    text: &str,
) -> Result<()> {
    let mut chat_guard = chat.lock().await;
    let Some(request) = chat_guard.submit(text) else {
        debug!("Submission rejected");
        return Ok(());
    };
    renderer.render_messages(chat_guard.take_unrendered())?;

    let spinner = PendingSpinner::new("Thinking...".to_string());
    chat_guard.complete(request).await;
    spinner.clear();

    renderer.render_messages(chat_guard.take_unrendered())
}

/// Formats the whole transcript as plain text.
fn format_transcript(messages: &[Message]) -> String {
    if messages.is_empty() {
        return "No messages yet".to_string();
    }

    let mut out = String::new();
    out.push_str("\n=== TRANSCRIPT ===\n");
    for (i, msg) in messages.iter().enumerate() {
        let sender_tag = msg.sender.as_str().to_uppercase();

        let mut content: String = msg.text.chars().take(MAX_TRANSCRIPT_TEXT).collect();
        if msg.text.chars().count() > MAX_TRANSCRIPT_TEXT {
            content.push_str("\n... [truncated]");
        }
        out.push_str(&format!(
            "{} [{}]: {}\n",
            sender_tag,
            msg.display_time(),
            content
        ));

        let products = msg.products();
        if !products.is_empty() {
            out.push_str("  Products:\n");
            for product in products {
                out.push_str(&format!(
                    "    - {} ({}): €{:.2}\n",
                    product.name, product.id, product.price
                ));
            }
        }

        if i < messages.len() - 1 {
            out.push_str("------\n");
        }
    }
    out.push_str("==================\n");
    out
}
