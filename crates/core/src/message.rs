//! Chat transcript entries and the products attached to them.
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of feature badges shown on a product card.
pub const MAX_CARD_FEATURES: usize = 3;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    User,
    Assistant,
}

impl SenderType {
    pub fn as_str(&self) -> &'static str {
        match &self {
            SenderType::User => "user",
            SenderType::Assistant => "assistant",
        }
    }
}

/// A recommended item as returned by the shop backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price in euros.
    pub price: f64,
    pub rating: f64,
    pub image_url: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Product {
    /// Features shown on the product card; anything past the first three is dropped.
    pub fn card_features(&self) -> &[String] {
        let end = self.features.len().min(MAX_CARD_FEATURES);
        &self.features[..end]
    }
}

/// One turn of the chat transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: i64,
    pub sender: SenderType,
    pub text: String,
    pub products: Option<Vec<Product>>,
    pub timestamp: String,
}

impl Message {
    /// Products to render as cards. Empty when the message carries none.
    pub fn products(&self) -> &[Product] {
        self.products.as_deref().unwrap_or_default()
    }

    /// `HH:MM` in local time when the timestamp parses, otherwise the raw value.
    ///
    /// Accepts RFC 3339 and the offset-less ISO form the backend emits.
    pub fn display_time(&self) -> String {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.timestamp) {
            return dt.with_timezone(&Local).format("%H:%M").to_string();
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
            return naive.format("%H:%M").to_string();
        }
        self.timestamp.clone()
    }
}

/// Hands out message ids from the wall clock in milliseconds, never repeating
/// or going backwards within a session.
#[derive(Debug, Default)]
pub struct MessageClock {
    last: i64,
}

impl MessageClock {
    pub fn new(last: i64) -> Self {
        Self { last }
    }

    pub fn next_id(&mut self) -> i64 {
        self.next_id_at(Utc::now().timestamp_millis())
    }

    fn next_id_at(&mut self, now_millis: i64) -> i64 {
        self.last = now_millis.max(self.last + 1);
        self.last
    }
}

pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339()
}
