//! Message models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ChatId, MessageId, UserId};

/// A single chat message.
///
/// Messages only ever exist locally after the server acknowledged them; the
/// client does not insert message bodies optimistically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    /// Server-assigned message id.
    pub id: MessageId,
    /// Conversation this message belongs to.
    pub chat_id: ChatId,
    /// Sender user id.
    pub sender_id: UserId,
    /// Sender display name.
    pub sender_name: String,
    /// Message body.
    pub text: String,
    /// Server-side creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Whether the receiver has read this message.
    pub is_read: bool,
    /// Whether this message was sent by the session user.
    pub is_mine: bool,
}

impl Message {
    /// Mark this message as sent by the session user.
    pub fn mark_as_mine(mut self) -> Self {
        self.is_mine = true;
        self
    }
}
