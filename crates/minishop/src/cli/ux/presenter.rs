use console::{Style, StyledObject};

/// Represents the kind of text on screen, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMessageType {
    /// The prompt for user input.
    Prompt,
    /// Header of a message typed by the user.
    User,
    /// Header of a message from the assistant.
    Assistant,
    /// Footer information, like hints or status.
    Footer,
    /// An error message.
    Error,
    Price,
    Rating,
    /// A product feature badge.
    Badge,
}

/// Styles a string of text according to the specified `ChatMessageType`.
pub fn style_chat_text(text: &str, style: ChatMessageType) -> StyledObject<&str> {
    let style_obj = match style {
        ChatMessageType::Prompt => Style::new().blue().bold(),
        ChatMessageType::User => Style::new().blue().bold(),
        ChatMessageType::Assistant => Style::new().white().bright().bold(),
        ChatMessageType::Footer => Style::new().white().dim(),
        ChatMessageType::Error => Style::new().red().bold(),
        ChatMessageType::Price => Style::new().green().bold(),
        ChatMessageType::Rating => Style::new().yellow(),
        ChatMessageType::Badge => Style::new().cyan(),
    };
    style_obj.apply_to(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_styles() {
        let styled = style_chat_text("test", ChatMessageType::Error);
        assert_eq!(
            styled.force_styling(true).to_string(),
            "\u{1b}[31m\u{1b}[1mtest\u{1b}[0m"
        );

        let plain = style_chat_text("€349.99", ChatMessageType::Price).force_styling(false);
        assert_eq!(plain.to_string(), "€349.99");
    }
}
