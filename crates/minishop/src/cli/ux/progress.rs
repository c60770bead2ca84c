use indicatif::{ProgressBar, ProgressStyle};

/// A spinner shown while a request to the shop backend is pending.
#[derive(Debug)]
pub struct PendingSpinner {
    spinner: ProgressBar,
}

impl PendingSpinner {
    /// Creates a new `PendingSpinner` with a message.
    pub fn new(msg: String) -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
            spinner.set_style(style.tick_strings(&["·  ", "·· ", "···", " ··", "  ·", "   "]));
        }
        spinner.set_message(msg);
        spinner.enable_steady_tick(std::time::Duration::from_millis(120));

        Self { spinner }
    }

    /// Stops the spinner and clears it from the terminal.
    pub fn clear(&self) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_spinner_new() {
        // Smoke test, terminal output is not captured.
        let spinner = PendingSpinner::new("Thinking...".to_string());
        assert_eq!(spinner.spinner.message(), "Thinking...");
        spinner.clear();
        assert!(spinner.spinner.is_finished());
    }
}
