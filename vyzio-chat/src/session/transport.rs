//! Transport seam between the session engine and the HTTP client.

use async_trait::async_trait;

use crate::client::VyzioClient;
use crate::error::Result;
use crate::models::{AdId, ChatId, Conversation, Message, Role, UserId};

/// Network operations the chat session engine depends on.
///
/// Implemented by [`VyzioClient`] for the real API and by in-memory mocks in
/// tests, so the optimistic open/reconcile/send logic can be exercised
/// without a server.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// List conversations for a user.
    async fn list_conversations(&self, user_id: &UserId, role: Role) -> Result<Vec<Conversation>>;

    /// Create or fetch the conversation for a (buyer, seller, ad) triple.
    /// The role selects which side of the triple is the counterpart in the
    /// returned record.
    async fn create_conversation(
        &self,
        buyer_id: &UserId,
        seller_id: &UserId,
        ad_id: &AdId,
        role: Role,
    ) -> Result<Conversation>;

    /// List all messages of a conversation.
    async fn list_messages(&self, chat_id: &ChatId) -> Result<Vec<Message>>;

    /// Send a message and return the persisted echo.
    async fn send_message(&self, chat_id: &ChatId, sender_id: &UserId, text: &str)
        -> Result<Message>;

    /// Mark counterpart messages in a conversation as read.
    async fn mark_read(&self, chat_id: &ChatId) -> Result<()>;

    /// Fallback display-name lookup for a user.
    async fn display_name(&self, user_id: &UserId) -> Result<String>;
}

#[async_trait]
impl ChatTransport for VyzioClient {
    async fn list_conversations(&self, user_id: &UserId, role: Role) -> Result<Vec<Conversation>> {
        self.chats().list(user_id, role).await
    }

    async fn create_conversation(
        &self,
        buyer_id: &UserId,
        seller_id: &UserId,
        ad_id: &AdId,
        role: Role,
    ) -> Result<Conversation> {
        self.chats().create(buyer_id, seller_id, ad_id, role).await
    }

    async fn list_messages(&self, chat_id: &ChatId) -> Result<Vec<Message>> {
        self.messages().list(chat_id).await
    }

    async fn send_message(
        &self,
        chat_id: &ChatId,
        sender_id: &UserId,
        text: &str,
    ) -> Result<Message> {
        self.messages()
            .send()
            .chat(chat_id.clone())
            .sender(sender_id.clone())
            .text(text)
            .send()
            .await
    }

    async fn mark_read(&self, chat_id: &ChatId) -> Result<()> {
        self.chats().mark_read(chat_id).await
    }

    async fn display_name(&self, user_id: &UserId) -> Result<String> {
        self.users().display_name(user_id).await
    }
}
