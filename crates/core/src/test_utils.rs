//! Test utilities for minishop-core and its dependents.
//!
//! `MockChatClient` stands in for the shop backend so the chat flow can be
//! exercised without a server.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use tempfile::Builder;

use crate::client::{ChatClient, ChatReply, ChatRequest, ClientError};
use crate::message::Product;

/// Creates a temporary config file with the given content.
///
/// # Panics
/// Panics if temp directory creation or file writing fails.
pub fn create_temp_config(content: &str) -> PathBuf {
    let temp_dir = Builder::new()
        .prefix("minishop-test")
        .rand_bytes(8)
        .tempdir()
        .unwrap();
    let config_path = temp_dir.path().join("minishop.yml");
    File::create(&config_path)
        .unwrap()
        .write_all(content.as_bytes())
        .unwrap();
    // Keep the temp directory alive by leaking it (this is just for tests)
    let _ = Box::leak(Box::new(temp_dir));
    config_path
}

/// A product shaped like the backend's catalog entries, with five features.
pub fn dummy_product(id: &str) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {id}"),
        description: format!("Description of {id}"),
        price: 349.99,
        rating: 4.3,
        image_url: format!("https://via.placeholder.com/300x300?text={id}"),
        features: vec![
            "50MP main camera".to_string(),
            "32MP front camera".to_string(),
            "6.4 inch Super AMOLED".to_string(),
            "5000mAh battery".to_string(),
            "5G ready".to_string(),
        ],
        category: Some("smartphone".to_string()),
    }
}

/// A reply carrying `products` dummy products (`None` when zero).
pub fn dummy_reply(text: &str, products: usize) -> ChatReply {
    ChatReply {
        response: text.to_string(),
        products: (products > 0)
            .then(|| (0..products).map(|i| dummy_product(&format!("p{i}"))).collect()),
        timestamp: "2024-05-01T14:03:59.123456".to_string(),
    }
}

/// How the mock answers chat submissions.
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Echo the request text back with the given number of products.
    Echo { products: usize },
    /// Fail every call with a 500.
    Error,
}

/// In-memory `ChatClient` that records every request it receives.
#[derive(Debug)]
pub struct MockChatClient {
    mode: MockMode,
    catalog: Vec<Product>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatClient {
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            catalog: vec![dummy_product("phone_001"), dummy_product("laptop_001")],
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn server_error() -> ClientError {
        ClientError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "mock failure".to_string(),
        }
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ClientError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.mode {
            MockMode::Echo { products } => {
                Ok(dummy_reply(&format!("You said: {}", request.message), *products))
            }
            MockMode::Error => Err(Self::server_error()),
        }
    }

    async fn products(&self) -> Result<Vec<Product>, ClientError> {
        match &self.mode {
            MockMode::Echo { .. } => Ok(self.catalog.clone()),
            MockMode::Error => Err(Self::server_error()),
        }
    }

    async fn product(&self, id: &str) -> Result<Product, ClientError> {
        if let MockMode::Error = self.mode {
            return Err(Self::server_error());
        }
        self.catalog
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ClientError::Status {
                status: StatusCode::NOT_FOUND,
                body: r#"{"detail":"Product not found"}"#.to_string(),
            })
    }

    async fn status(&self) -> Result<String, ClientError> {
        match &self.mode {
            MockMode::Echo { .. } => Ok("MiniGPT-Shop API is running!".to_string()),
            MockMode::Error => Err(Self::server_error()),
        }
    }
}
