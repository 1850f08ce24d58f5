//! Message API.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::{
    client::VyzioClientInner,
    error::{Error, Result},
    models::{ChatId, Message, UserId},
};

/// API for message operations.
pub struct MessageApi {
    client: Arc<VyzioClientInner>,
}

impl MessageApi {
    pub(crate) fn new(client: Arc<VyzioClientInner>) -> Self {
        Self { client }
    }

    /// Get all messages of a conversation, chronological as returned by the
    /// server. The client never reorders.
    pub async fn list(&self, chat_id: &ChatId) -> Result<Vec<Message>> {
        let api = format!("api/chats/{chat_id}/messages/");
        let value = self.client.get(&api).await?;

        let current_uid = self.client.auth.as_ref().map(|a| a.uid.clone());
        let items: Vec<MessageDto> = serde_json::from_value(value)?;
        Ok(items
            .into_iter()
            .map(|dto| dto.into_message(current_uid.as_deref()))
            .collect())
    }

    /// Send a message into a confirmed conversation.
    pub fn send(&self) -> SendMessageBuilder {
        SendMessageBuilder {
            client: self.client.clone(),
            chat_id: None,
            sender_id: None,
            text: String::new(),
        }
    }
}

/// Builder for sending messages.
pub struct SendMessageBuilder {
    client: Arc<VyzioClientInner>,
    chat_id: Option<ChatId>,
    sender_id: Option<UserId>,
    text: String,
}

impl SendMessageBuilder {
    /// Set the target conversation.
    pub fn chat(mut self, chat_id: impl Into<ChatId>) -> Self {
        self.chat_id = Some(chat_id.into());
        self
    }

    /// Set the sender. Defaults to the authenticated user.
    pub fn sender(mut self, sender_id: impl Into<UserId>) -> Self {
        self.sender_id = Some(sender_id.into());
        self
    }

    /// Set the message text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Execute the request and return the persisted message echo.
    pub async fn send(self) -> Result<Message> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(Error::invalid("Message text cannot be empty"));
        }

        let chat_id = self
            .chat_id
            .ok_or_else(|| Error::invalid("Target chat is required"))?;

        let sender_id = match self.sender_id {
            Some(id) => id,
            None => UserId::new(&self.client.require_auth()?.uid),
        };

        let body = json!({
            "chat_id": chat_id.as_str(),
            "sender_id": sender_id.as_str(),
            "text": text,
        });

        let value = self.client.post("api/messages/send/", &body).await?;
        let dto: MessageDto = serde_json::from_value(value)?;

        Ok(dto.into_message(Some(sender_id.as_str())))
    }
}

/// Wire format of a message record.
#[derive(Debug, Deserialize)]
struct MessageDto {
    id: i64,
    #[serde(alias = "chat_id", default)]
    chat: i64,
    #[serde(alias = "sender_id", default)]
    sender: i64,
    #[serde(default)]
    sender_name: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    is_read: bool,
}

impl MessageDto {
    fn into_message(self, current_uid: Option<&str>) -> Message {
        let sender_id = UserId::from(self.sender);
        let is_mine = Some(sender_id.as_str()) == current_uid;

        Message {
            id: self.id.into(),
            chat_id: self.chat.into(),
            sender_id,
            sender_name: self.sender_name,
            text: self.text,
            created_at: self.created_at,
            is_read: self.is_read,
            is_mine,
        }
    }
}
