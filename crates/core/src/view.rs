//! The chat view is the client-side state of one conversation with the shop
//! assistant: the transcript, the input buffer, and whether a request is in
//! flight.
//!
//! It never performs I/O. `submit` hands back the request to send and
//! `complete` takes its outcome, so the caller decides how the call runs.
use tracing::{debug, error};

use crate::client::{ChatReply, ChatRequest, ClientError};
use crate::config::ChatConfig;
use crate::message::{Message, MessageClock, SenderType, now_timestamp};

/// Shown in place of a reply when the backend call fails for any reason.
pub const FALLBACK_REPLY: &str = "Sorry, I'm having trouble connecting to the server. Please make sure the backend is running and reachable.";

/// Append-only transcript plus the input and pending state.
#[derive(Debug)]
pub struct ChatView {
    user_id: String,
    messages: Vec<Message>,
    input: String,
    pending: bool,
    // Index of the first message not yet handed to the renderer
    rendered: usize,
    clock: MessageClock,
}

impl ChatView {
    /// Creates a view seeded with the assistant greeting (id 1).
    pub fn new(config: &ChatConfig) -> Self {
        let greeting = Message {
            id: 1,
            sender: SenderType::Assistant,
            text: config.greeting.clone(),
            products: None,
            timestamp: now_timestamp(),
        };
        Self {
            user_id: config.user_id.clone(),
            messages: vec![greeting],
            input: String::new(),
            pending: false,
            rendered: 0,
            clock: MessageClock::new(1),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Whether the send action is enabled for the current input.
    pub fn can_send(&self) -> bool {
        !self.pending && !self.input.trim().is_empty()
    }

    /// Submits the input buffer.
    ///
    /// Returns `None` and leaves the view untouched when the input is blank or
    /// a request is already pending. Otherwise the user message is appended,
    /// the input is cleared, the view turns pending, and the request to send
    /// is returned.
    pub fn submit(&mut self) -> Option<ChatRequest> {
        if !self.can_send() {
            debug!(pending = self.pending, "Ignoring submit");
            return None;
        }

        let text = std::mem::take(&mut self.input);
        let id = self.clock.next_id();
        self.messages.push(Message {
            id,
            sender: SenderType::User,
            text: text.clone(),
            products: None,
            timestamp: now_timestamp(),
        });
        self.pending = true;

        Some(ChatRequest {
            message: text,
            user_id: self.user_id.clone(),
        })
    }

    /// Replaces the input with `text` and submits it.
    pub fn submit_text(&mut self, text: &str) -> Option<ChatRequest> {
        if self.pending || text.trim().is_empty() {
            return None;
        }
        self.set_input(text);
        self.submit()
    }

    /// Applies the outcome of the in-flight request.
    ///
    /// Any failure becomes the fallback message; the error itself is only
    /// logged. Does nothing when no request is pending.
    pub fn complete(&mut self, outcome: Result<ChatReply, ClientError>) -> Option<&Message> {
        if !self.pending {
            debug!("Ignoring completion without a pending request");
            return None;
        }

        let id = self.clock.next_id();
        let message = match outcome {
            Ok(reply) => Message {
                id,
                sender: SenderType::Assistant,
                text: reply.response,
                products: reply.products,
                timestamp: reply.timestamp,
            },
            Err(e) => {
                error!("Chat request failed: {e}");
                Message {
                    id,
                    sender: SenderType::Assistant,
                    text: FALLBACK_REPLY.to_string(),
                    products: None,
                    timestamp: now_timestamp(),
                }
            }
        };

        self.messages.push(message);
        self.pending = false;
        self.messages.last()
    }

    /// Messages appended since the previous call, oldest first.
    ///
    /// The renderer drains this after every change so the newest message is
    /// always the last thing on screen.
    pub fn take_unrendered(&mut self) -> &[Message] {
        let start = self.rendered;
        self.rendered = self.messages.len();
        &self.messages[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::dummy_reply;
    use reqwest::StatusCode;

    fn new_view() -> ChatView {
        ChatView::new(&ChatConfig {
            user_id: "demo_user".to_string(),
            greeting: "Hello!".to_string(),
        })
    }

    fn status_error() -> ClientError {
        ClientError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream down".to_string(),
        }
    }

    #[test]
    fn test_new_view_has_greeting() {
        let view = new_view();
        assert_eq!(view.messages().len(), 1);
        let greeting = &view.messages()[0];
        assert_eq!(greeting.id, 1);
        assert_eq!(greeting.sender, SenderType::Assistant);
        assert_eq!(greeting.text, "Hello!");
        assert!(!view.is_pending());
        assert!(!view.can_send());
    }

    #[test]
    fn test_submit_appends_user_message_before_request() {
        let mut view = new_view();
        view.set_input("I'm looking for a smartphone under €400");
        assert!(view.can_send());

        let request = view.submit().unwrap();

        assert_eq!(request.message, "I'm looking for a smartphone under €400");
        assert_eq!(request.user_id, "demo_user");
        assert_eq!(view.messages().len(), 2);
        let user = &view.messages()[1];
        assert_eq!(user.sender, SenderType::User);
        assert_eq!(user.text, "I'm looking for a smartphone under €400");
        assert!(user.products.is_none());
        assert!(user.id > 1);
        assert!(view.input().is_empty());
        assert!(view.is_pending());
        assert!(!view.can_send());
    }

    #[test]
    fn test_submit_blank_input_is_noop() {
        let mut view = new_view();
        for blank in ["", "   ", "\n\t "] {
            view.set_input(blank);
            assert!(!view.can_send());
            assert!(view.submit().is_none());
            assert_eq!(view.messages().len(), 1);
            assert!(!view.is_pending());
            assert_eq!(view.input(), blank);
        }
    }

    #[test]
    fn test_submit_while_pending_is_noop() {
        let mut view = new_view();
        view.submit_text("first").unwrap();

        view.set_input("second");
        assert!(!view.can_send());
        assert!(view.submit().is_none());
        assert_eq!(view.messages().len(), 2);
        assert_eq!(view.input(), "second");
        assert!(view.is_pending());

        assert!(view.submit_text("third").is_none());
        assert_eq!(view.messages().len(), 2);
    }

    #[test]
    fn test_submit_keeps_text_verbatim() {
        let mut view = new_view();
        let request = view.submit_text("  padded  ").unwrap();
        assert_eq!(request.message, "  padded  ");
        assert_eq!(view.messages()[1].text, "  padded  ");
    }

    #[test]
    fn test_complete_success_appends_reply() {
        let mut view = new_view();
        view.submit_text("phones").unwrap();

        let reply = dummy_reply("Here are my top recommendations:", 2);
        let message = view.complete(Ok(reply.clone())).unwrap().clone();

        assert_eq!(message.sender, SenderType::Assistant);
        assert_eq!(message.text, "Here are my top recommendations:");
        assert_eq!(message.products, reply.products);
        assert_eq!(message.timestamp, reply.timestamp);
        assert!(!view.is_pending());
        assert_eq!(view.messages().len(), 3);
        assert!(view.messages()[2].id > view.messages()[1].id);
    }

    #[test]
    fn test_complete_failure_appends_fallback() {
        let mut view = new_view();
        view.submit_text("phones").unwrap();

        view.complete(Err(status_error()));

        assert_eq!(view.messages().len(), 3);
        let fallback = &view.messages()[2];
        assert_eq!(fallback.sender, SenderType::Assistant);
        assert_eq!(fallback.text, FALLBACK_REPLY);
        assert!(fallback.products.is_none());
        assert!(!view.is_pending());

        // The user can simply try again
        assert!(view.submit_text("phones").is_some());
    }

    #[test]
    fn test_complete_without_pending_is_noop() {
        let mut view = new_view();
        assert!(view.complete(Ok(dummy_reply("stray", 0))).is_none());
        assert_eq!(view.messages().len(), 1);
    }

    #[test]
    fn test_history_length_after_k_turns() {
        let mut view = new_view();
        let k = 4;
        for i in 0..k {
            view.submit_text(&format!("question {i}")).unwrap();
            view.complete(Ok(dummy_reply(&format!("answer {i}"), i)));
        }
        assert_eq!(view.messages().len(), 1 + 2 * k);

        let senders: Vec<_> = view.messages().iter().map(|m| m.sender).collect();
        assert_eq!(senders[0], SenderType::Assistant);
        for pair in senders[1..].chunks(2) {
            assert_eq!(pair, [SenderType::User, SenderType::Assistant]);
        }
        let ids: Vec<_> = view.messages().iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_take_unrendered_follows_newest() {
        let mut view = new_view();
        assert_eq!(view.take_unrendered().len(), 1);
        assert!(view.take_unrendered().is_empty());

        view.submit_text("laptop").unwrap();
        let fresh = view.take_unrendered();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].text, "laptop");

        view.complete(Ok(dummy_reply("MacBook Air M2", 1)));
        let fresh = view.take_unrendered();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].text, "MacBook Air M2");
        assert!(view.take_unrendered().is_empty());
    }
}
