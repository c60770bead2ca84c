mod presenter;
mod progress;
mod render;

pub use presenter::{ChatMessageType, style_chat_text};
pub use progress::PendingSpinner;
pub use render::*;

use console::style;

/// Prints a formatted error message to stderr.
pub fn present_error(error: anyhow::Error) {
    let error_text = style("ERROR:").red().bold();
    eprintln!("\n{error_text} {error:#}");
}
