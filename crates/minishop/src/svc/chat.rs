use anyhow::{Context, Result};
use minishop_core::client::{ChatClient, ChatRequest, HttpChatClient};
use minishop_core::config::{ChatConfig, Config};
use minishop_core::message::{Message, Product};
use minishop_core::view::ChatView;
use std::sync::Arc;
use tracing::{debug, info};

/// Chat conversation between a shopper and the shop assistant backend.
pub struct Chat {
    view: ChatView,
    client: Arc<dyn ChatClient>,
    endpoint: String,
}

impl Chat {
    pub fn new(config: &Config) -> Result<Self> {
        let client = HttpChatClient::new(&config.server).context("Failed to build HTTP client")?;
        let endpoint = client.endpoint().to_string();
        info!("Chatting with {endpoint}");
        Ok(Self::with_client(&config.chat, Arc::new(client), endpoint))
    }

    pub fn with_client(
        chat_config: &ChatConfig,
        client: Arc<dyn ChatClient>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            view: ChatView::new(chat_config),
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn view(&self) -> &ChatView {
        &self.view
    }

    /// Appends the user message and returns the request to send, or `None`
    /// when the text is blank or a request is already in flight.
    pub fn submit(&mut self, text: &str) -> Option<ChatRequest> {
        self.view.submit_text(text)
    }

    /// Sends a submitted request and records the reply or the fallback.
    pub async fn complete(&mut self, request: ChatRequest) -> Option<&Message> {
        let outcome = self.client.send(&request).await;
        debug!(ok = outcome.is_ok(), "Chat request finished");
        self.view.complete(outcome)
    }

    /// Submits `text` and waits for the reply. Returns `false` when the
    /// submission was rejected.
    pub async fn send(&mut self, text: &str) -> bool {
        match self.submit(text) {
            Some(request) => {
                self.complete(request).await;
                true
            }
            None => false,
        }
    }

    /// Messages added since the last render.
    pub fn take_unrendered(&mut self) -> &[Message] {
        self.view.take_unrendered()
    }

    pub fn messages(&self) -> &[Message] {
        self.view.messages()
    }

    /// Lists the catalog, optionally keeping one category (case-insensitive).
    pub async fn products(&self, category: Option<&str>) -> Result<Vec<Product>> {
        let products = self
            .client
            .products()
            .await
            .context("Failed to fetch the product catalog")?;
        Ok(match category {
            Some(category) => products
                .into_iter()
                .filter(|p| {
                    p.category
                        .as_deref()
                        .is_some_and(|c| c.eq_ignore_ascii_case(category))
                })
                .collect(),
            None => products,
        })
    }

    pub async fn product(&self, id: &str) -> Result<Product> {
        self.client
            .product(id)
            .await
            .with_context(|| format!("Failed to fetch product '{id}'"))
    }

    pub async fn status(&self) -> Result<String> {
        self.client
            .status()
            .await
            .with_context(|| format!("Backend at {} is not reachable", self.endpoint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minishop_core::message::SenderType;
    use minishop_core::test_utils::{MockChatClient, MockMode};
    use minishop_core::view::FALLBACK_REPLY;

    fn chat_with(mode: MockMode) -> (Chat, Arc<MockChatClient>) {
        let client = Arc::new(MockChatClient::new(mode));
        let chat = Chat::with_client(&ChatConfig::default(), client.clone(), "mock://chat");
        (chat, client)
    }

    #[tokio::test]
    async fn test_send_success() {
        let (mut chat, client) = chat_with(MockMode::Echo { products: 2 });

        assert!(chat.send("I'm looking for a smartphone under €400").await);

        let messages = chat.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].sender, SenderType::User);
        assert_eq!(
            messages[2].text,
            "You said: I'm looking for a smartphone under €400"
        );
        assert_eq!(messages[2].products().len(), 2);
        assert!(!chat.view().is_pending());

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].user_id, "demo_user");
    }

    #[tokio::test]
    async fn test_send_rejects_blank_without_network() {
        let (mut chat, client) = chat_with(MockMode::Echo { products: 0 });
        assert!(!chat.send("   ").await);
        assert_eq!(chat.messages().len(), 1);
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_submit_is_visible_before_completion() {
        let (mut chat, client) = chat_with(MockMode::Echo { products: 0 });

        let request = chat.submit("headphones").unwrap();
        assert_eq!(chat.messages().len(), 2);
        assert!(chat.view().is_pending());
        assert!(client.requests().is_empty());
        assert!(chat.submit("again").is_none());

        let reply = chat.complete(request).await.unwrap();
        assert_eq!(reply.text, "You said: headphones");
        assert_eq!(client.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_send_failure_uses_fallback() {
        let (mut chat, _client) = chat_with(MockMode::Error);
        assert!(chat.send("laptop").await);
        let messages = chat.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].text, FALLBACK_REPLY);
        assert!(!chat.view().is_pending());
    }

    #[tokio::test]
    async fn test_products_filter_by_category() {
        let (chat, _client) = chat_with(MockMode::Echo { products: 0 });
        assert_eq!(chat.products(None).await.unwrap().len(), 2);
        assert_eq!(chat.products(Some("SmartPhone")).await.unwrap().len(), 2);
        assert!(chat.products(Some("laptop")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_catalog_errors_carry_context() {
        let (chat, _client) = chat_with(MockMode::Echo { products: 0 });
        let err = chat.product("missing").await.unwrap_err();
        assert!(err.to_string().contains("Failed to fetch product 'missing'"));

        let (chat, _client) = chat_with(MockMode::Error);
        let err = chat.status().await.unwrap_err();
        assert!(err.to_string().contains("Backend at mock://chat is not reachable"));
        // Catalog failures never touch the transcript
        assert!(chat.products(None).await.is_err());
        assert_eq!(chat.messages().len(), 1);
    }
}
