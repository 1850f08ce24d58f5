//! Conversation models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AdId, ChatId, UserId};

/// Server-side identity of a conversation.
///
/// A conversation starts `Pending` when the user opens it optimistically and
/// is promoted to `Confirmed` once the server assigns an identifier. The
/// promotion is one-way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatHandle {
    /// Locally synthesized, not yet acknowledged by the server.
    #[default]
    Pending,
    /// Confirmed by the server under this identifier.
    Confirmed(ChatId),
}

impl ChatHandle {
    /// Get the server identifier, if confirmed.
    pub fn chat_id(&self) -> Option<&ChatId> {
        match self {
            ChatHandle::Pending => None,
            ChatHandle::Confirmed(id) => Some(id),
        }
    }

    /// Check whether the conversation is still pending.
    pub fn is_pending(&self) -> bool {
        matches!(self, ChatHandle::Pending)
    }
}

/// A buyer/seller conversation about an advertisement.
///
/// The advertisement id is the correlation key while the conversation is
/// pending; the server chat id is authoritative once confirmed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    /// Advertisement this conversation is about.
    pub ad_id: AdId,
    /// Advertisement title, for display.
    pub ad_title: String,
    /// Server-side identity.
    pub handle: ChatHandle,
    /// Counterpart user id, when known (always known for locally opened
    /// conversations; list responses omit it).
    pub counterpart_id: Option<UserId>,
    /// Counterpart display name.
    pub counterpart_name: String,
    /// Text of the most recent message.
    pub last_message: String,
    /// Timestamp of the most recent message.
    pub last_message_time: Option<DateTime<Utc>>,
    /// Number of unread messages from the counterpart.
    pub unread_count: u32,
}

impl Conversation {
    /// Create a pending conversation for an advertisement.
    pub fn pending(
        ad_id: impl Into<AdId>,
        ad_title: impl Into<String>,
        counterpart_id: impl Into<UserId>,
        counterpart_name: impl Into<String>,
    ) -> Self {
        Self {
            ad_id: ad_id.into(),
            ad_title: ad_title.into(),
            handle: ChatHandle::Pending,
            counterpart_id: Some(counterpart_id.into()),
            counterpart_name: counterpart_name.into(),
            ..Default::default()
        }
    }

    /// Get the server identifier, if confirmed.
    pub fn chat_id(&self) -> Option<&ChatId> {
        self.handle.chat_id()
    }

    /// Check whether this conversation is still pending.
    pub fn is_pending(&self) -> bool {
        self.handle.is_pending()
    }

    /// Absorb fields from another record for the same conversation.
    ///
    /// Server-supplied fields win when present; a confirmed handle is never
    /// demoted back to pending, and a known counterpart id is never dropped.
    /// The unread counter is only taken from confirmed records, since pending
    /// ones are locally synthesized and always carry zero.
    pub fn absorb(&mut self, other: Conversation) {
        let other_confirmed = !other.is_pending();
        if let ChatHandle::Confirmed(id) = other.handle {
            self.handle = ChatHandle::Confirmed(id);
        }
        if other.counterpart_id.is_some() {
            self.counterpart_id = other.counterpart_id;
        }
        if !other.counterpart_name.is_empty() {
            self.counterpart_name = other.counterpart_name;
        }
        if !other.ad_title.is_empty() {
            self.ad_title = other.ad_title;
        }
        if !other.last_message.is_empty() {
            self.last_message = other.last_message;
        }
        if other.last_message_time.is_some() {
            self.last_message_time = other.last_message_time;
        }
        if other_confirmed {
            self.unread_count = other.unread_count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_has_no_chat_id() {
        let conv = Conversation::pending(42i64, "Mountain bike", 7i64, "Alice");
        assert!(conv.is_pending());
        assert_eq!(conv.chat_id(), None);
    }

    #[test]
    fn test_absorb_promotes_handle() {
        let mut conv = Conversation::pending(42i64, "Mountain bike", 7i64, "Alice");
        let confirmed = Conversation {
            ad_id: AdId::from(42i64),
            handle: ChatHandle::Confirmed(ChatId::from(501i64)),
            last_message: "hello".into(),
            ..Default::default()
        };

        conv.absorb(confirmed);
        assert_eq!(conv.chat_id(), Some(&ChatId::from(501i64)));
        // Locally known fields survive when the server omits them.
        assert_eq!(conv.counterpart_name, "Alice");
        assert_eq!(conv.counterpart_id, Some(UserId::from(7i64)));
        assert_eq!(conv.last_message, "hello");
    }

    #[test]
    fn test_absorb_pending_keeps_unread_count() {
        let mut conv = Conversation {
            handle: ChatHandle::Confirmed(ChatId::from(501i64)),
            unread_count: 3,
            ..Default::default()
        };

        // Re-opening the conversation locally must not clear the counter;
        // only a server record or an actual mark-read does.
        conv.absorb(Conversation::pending(42i64, "Mountain bike", 7i64, "Alice"));
        assert_eq!(conv.unread_count, 3);

        let server = Conversation {
            handle: ChatHandle::Confirmed(ChatId::from(501i64)),
            unread_count: 0,
            ..Default::default()
        };
        conv.absorb(server);
        assert_eq!(conv.unread_count, 0);
    }

    #[test]
    fn test_absorb_never_demotes() {
        let mut conv = Conversation {
            handle: ChatHandle::Confirmed(ChatId::from(501i64)),
            ..Default::default()
        };
        conv.absorb(Conversation::default());
        assert_eq!(conv.chat_id(), Some(&ChatId::from(501i64)));
    }
}
