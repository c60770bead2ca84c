//! HTTP client for the shop backend.
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ServerConfig;
use crate::message::Product;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Server returned status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Body of a chat submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub user_id: String,
}

/// Body of a successful chat reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub products: Option<Vec<Product>>,
    pub timestamp: String,
}

#[derive(Deserialize, Debug)]
struct CatalogResponse {
    products: Vec<Product>,
}

#[derive(Deserialize, Debug)]
struct StatusResponse {
    message: String,
}

/// The outbound seam of the chat view.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Posts one chat message and returns the assistant reply.
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ClientError>;

    /// Lists the whole product catalog.
    async fn products(&self) -> Result<Vec<Product>, ClientError>;

    /// Looks up a single product by id.
    async fn product(&self, id: &str) -> Result<Product, ClientError>;

    /// Returns the backend's status banner.
    async fn status(&self) -> Result<String, ClientError>;
}

/// Talks to the backend over HTTP. Catalog and status routes are resolved
/// relative to the chat endpoint, so `http://host/api/chat` pairs with
/// `http://host/api/products`.
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    endpoint: Url,
    client: Client,
}

impl HttpChatClient {
    pub fn new(server: &ServerConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = server.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            endpoint: server.endpoint.clone(),
            client: builder.build()?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn route(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.endpoint.join(path)?)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ClientError::Status { status, body })
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    #[instrument(skip(self, request), fields(endpoint = %self.endpoint))]
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ClientError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;
        let reply: ChatReply = Self::check(response).await?.json().await?;
        debug!(
            products = reply.products.as_ref().map_or(0, Vec::len),
            "Received chat reply"
        );
        Ok(reply)
    }

    #[instrument(skip(self))]
    async fn products(&self) -> Result<Vec<Product>, ClientError> {
        let url = self.route("products")?;
        let response = self.client.get(url).send().await?;
        let catalog: CatalogResponse = Self::check(response).await?.json().await?;
        Ok(catalog.products)
    }

    #[instrument(skip(self))]
    async fn product(&self, id: &str) -> Result<Product, ClientError> {
        let mut url = self.route("products/")?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(id);
        let response = self.client.get(url).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    #[instrument(skip(self))]
    async fn status(&self) -> Result<String, ClientError> {
        let url = self.route("./")?;
        let response = self.client.get(url).send().await?;
        let status: StatusResponse = Self::check(response).await?.json().await?;
        Ok(status.message)
    }
}
