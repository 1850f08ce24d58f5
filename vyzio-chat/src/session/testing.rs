//! In-memory transport for engine tests.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{Error, Result};
use crate::models::{AdId, ChatHandle, ChatId, Conversation, Message, Role, UserId};

use super::ChatTransport;

/// Scriptable transport that records every call it receives.
#[derive(Default)]
pub(crate) struct MockTransport {
    /// Call log, e.g. `"create:42"` or `"send:501:Hello"`.
    pub calls: Mutex<Vec<String>>,
    /// Canned conversation list response.
    pub conversations: Mutex<Vec<Conversation>>,
    /// Canned message list response, also extended by sends.
    pub messages: Mutex<Vec<Message>>,
    pub fail_list: AtomicBool,
    pub fail_create: AtomicBool,
    pub fail_send: AtomicBool,
    pub fail_mark_read: AtomicBool,
    /// Chat id handed out by the next create call.
    pub next_chat_id: AtomicI64,
    /// Artificial latency for send calls, in milliseconds.
    pub send_delay_ms: AtomicU64,
    next_message_id: AtomicI64,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            next_chat_id: AtomicI64::new(501),
            next_message_id: AtomicI64::new(1000),
            ..Default::default()
        }
    }

    fn log(&self, entry: impl Into<String>) {
        self.calls.lock().unwrap().push(entry.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_matching(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn list_conversations(
        &self,
        _user_id: &UserId,
        _role: Role,
    ) -> Result<Vec<Conversation>> {
        self.log("list");
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Error::api(500, "list unavailable"));
        }
        Ok(self.conversations.lock().unwrap().clone())
    }

    async fn create_conversation(
        &self,
        buyer_id: &UserId,
        seller_id: &UserId,
        ad_id: &AdId,
        role: Role,
    ) -> Result<Conversation> {
        self.log(format!("create:{ad_id}"));
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Error::api(500, "create unavailable"));
        }

        let (counterpart_id, counterpart_name) = match role {
            Role::Buyer => (seller_id.clone(), "Alice"),
            Role::Seller => (buyer_id.clone(), "Bob"),
        };

        let chat_id = self.next_chat_id.load(Ordering::SeqCst);
        Ok(Conversation {
            ad_id: ad_id.clone(),
            handle: ChatHandle::Confirmed(ChatId::from(chat_id)),
            counterpart_id: Some(counterpart_id),
            counterpart_name: counterpart_name.into(),
            ..Default::default()
        })
    }

    async fn list_messages(&self, chat_id: &ChatId) -> Result<Vec<Message>> {
        self.log(format!("messages:{chat_id}"));
        Ok(self.messages.lock().unwrap().clone())
    }

    async fn send_message(
        &self,
        chat_id: &ChatId,
        sender_id: &UserId,
        text: &str,
    ) -> Result<Message> {
        self.log(format!("send:{chat_id}:{text}"));

        let delay = self.send_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(Error::api(500, "send unavailable"));
        }

        let message = Message {
            id: self.next_message_id.fetch_add(1, Ordering::SeqCst).into(),
            chat_id: chat_id.clone(),
            sender_id: sender_id.clone(),
            text: text.to_owned(),
            created_at: Some(Utc::now()),
            ..Default::default()
        }
        .mark_as_mine();
        self.messages.lock().unwrap().push(message.clone());
        Ok(message)
    }

    async fn mark_read(&self, chat_id: &ChatId) -> Result<()> {
        self.log(format!("mark_read:{chat_id}"));
        if self.fail_mark_read.load(Ordering::SeqCst) {
            return Err(Error::api(500, "mark-read unavailable"));
        }
        Ok(())
    }

    async fn display_name(&self, user_id: &UserId) -> Result<String> {
        self.log(format!("display_name:{user_id}"));
        Ok("Alice".into())
    }
}
