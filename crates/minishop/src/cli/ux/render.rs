use std::io::Write;

use anyhow::Result;
use minishop_core::message::{Message, Product, SenderType};

use super::presenter::{ChatMessageType, style_chat_text};

/// Formats one product as a boxed card: name, description, price, rating,
/// up to three feature badges, and the image link.
pub fn format_product_card(product: &Product) -> String {
    let bar = style_chat_text("│", ChatMessageType::Footer);
    let mut out = String::new();

    out.push_str(&format!(
        "  {} {}\n",
        style_chat_text("┌─", ChatMessageType::Footer),
        style_chat_text(&product.name, ChatMessageType::Assistant)
    ));
    if !product.description.is_empty() {
        out.push_str(&format!("  {bar}  {}\n", product.description));
    }

    let price = format!("€{:.2}", product.price);
    let rating = format!("★ {:.1}", product.rating);
    out.push_str(&format!(
        "  {bar}  {}   {}\n",
        style_chat_text(&price, ChatMessageType::Price),
        style_chat_text(&rating, ChatMessageType::Rating)
    ));

    let features = product.card_features();
    if !features.is_empty() {
        let badges = features
            .iter()
            .map(|f| {
                style_chat_text(&format!("[{f}]"), ChatMessageType::Badge).to_string()
            })
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!("  {bar}  Key Features: {badges}\n"));
    }

    if !product.image_url.is_empty() {
        out.push_str(&format!(
            "  {bar}  {}\n",
            style_chat_text(&format!("Image: {}", product.image_url), ChatMessageType::Footer)
        ));
    }
    out.push_str(&format!("  {}\n", style_chat_text("└─", ChatMessageType::Footer)));
    out
}

/// Formats a message header, its text, and any product cards.
pub fn format_message(message: &Message) -> String {
    let (label, kind) = match message.sender {
        SenderType::User => ("▸ You", ChatMessageType::User),
        SenderType::Assistant => ("● Assistant", ChatMessageType::Assistant),
    };

    let mut out = format!(
        "{} {}\n{}\n",
        style_chat_text(label, kind),
        style_chat_text(&message.display_time(), ChatMessageType::Footer),
        message.text.trim_end()
    );

    let products = message.products();
    if message.sender == SenderType::Assistant && !products.is_empty() {
        out.push('\n');
        for product in products {
            out.push_str(&format_product_card(product));
        }
    }
    out
}

/// Writes chat messages and product cards to a terminal or any other sink.
pub struct TerminalRenderer<'a> {
    out: &'a mut dyn Write,
}

impl<'a> TerminalRenderer<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self { out }
    }

    pub fn render_message(&mut self, message: &Message) -> Result<()> {
        writeln!(self.out)?;
        self.out.write_all(format_message(message).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    pub fn render_messages(&mut self, messages: &[Message]) -> Result<()> {
        for message in messages {
            self.render_message(message)?;
        }
        Ok(())
    }

    pub fn render_products(&mut self, products: &[Product]) -> Result<()> {
        if products.is_empty() {
            writeln!(
                self.out,
                "{}",
                style_chat_text("No products found.", ChatMessageType::Footer)
            )?;
        }
        for product in products {
            self.out.write_all(format_product_card(product).as_bytes())?;
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn render_text(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()?;
        Ok(())
    }
}
