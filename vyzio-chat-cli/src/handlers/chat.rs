//! Chat handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use vyzio_chat::{AdId, ChatId, ChatSession, Conversation, Message, UserId, VyzioClient};

use crate::config::AuthConfig;
use crate::output::{format_relative_time, PlainPrint, TableRow};

/// Build the session engine for the configured user.
pub fn session_from(client: VyzioClient, auth: &AuthConfig) -> Arc<ChatSession> {
    Arc::new(ChatSession::new(
        Arc::new(client),
        auth.uid.as_str(),
        auth.role,
    ))
}

/// Conversation list entry.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRow {
    pub chat_id: String,
    pub ad_id: String,
    pub ad_title: String,
    pub with: String,
    pub last_message: String,
    pub last_time: String,
    pub unread_count: u32,
    pub pending: bool,
}

impl From<&Conversation> for ChatRow {
    fn from(c: &Conversation) -> Self {
        Self {
            chat_id: c
                .chat_id()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
            ad_id: c.ad_id.to_string(),
            ad_title: c.ad_title.clone(),
            with: c.counterpart_name.clone(),
            last_message: c.last_message.clone(),
            last_time: format_relative_time(c.last_message_time),
            unread_count: c.unread_count,
            pending: c.is_pending(),
        }
    }
}

impl TableRow for ChatRow {
    fn headers() -> Vec<&'static str> {
        vec!["Chat", "Ad", "Title", "With", "Last", "Unread"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.chat_id.clone(),
            self.ad_id.clone(),
            self.ad_title.clone(),
            self.with.clone(),
            self.last_time.clone(),
            if self.unread_count > 0 {
                self.unread_count.to_string()
            } else {
                String::new()
            },
        ]
    }
}

impl PlainPrint for ChatRow {
    fn plain_print(&self) {
        let unread_marker = if self.unread_count > 0 {
            format!("● {} ", self.unread_count).red().to_string()
        } else {
            String::new()
        };
        println!(
            "{}[{}] {} {} {}",
            unread_marker,
            self.chat_id.cyan(),
            self.with.green(),
            self.ad_title.bold(),
            self.last_time.dimmed()
        );
        if !self.last_message.is_empty() {
            println!("   {}", self.last_message);
        }
    }
}

/// One message of a conversation.
#[derive(Debug, Clone, Serialize)]
pub struct MessageRow {
    pub id: String,
    pub from: String,
    pub from_uid: String,
    pub is_mine: bool,
    pub text: String,
    pub time: String,
}

impl From<&Message> for MessageRow {
    fn from(m: &Message) -> Self {
        Self {
            id: m.id.to_string(),
            from: if m.is_mine {
                "You".to_string()
            } else if !m.sender_name.is_empty() {
                m.sender_name.clone()
            } else {
                m.sender_id.to_string()
            },
            from_uid: m.sender_id.to_string(),
            is_mine: m.is_mine,
            text: m.text.clone(),
            time: format_relative_time(m.created_at),
        }
    }
}

impl TableRow for MessageRow {
    fn headers() -> Vec<&'static str> {
        vec!["From", "Message", "Time"]
    }
    fn row(&self) -> Vec<String> {
        vec![self.from.clone(), self.text.clone(), self.time.clone()]
    }
}

impl PlainPrint for MessageRow {
    fn plain_print(&self) {
        let from_display = if self.is_mine {
            "You".green().to_string()
        } else {
            self.from.clone()
        };
        println!("{} {}", from_display, self.time.dimmed());
        for line in self.text.lines() {
            if !line.trim().is_empty() {
                println!("   {}", line);
            }
        }
        println!();
    }
}

/// Conversation list result.
#[derive(Debug, Serialize)]
pub struct ChatListResult {
    pub chats: Vec<ChatRow>,
}

/// Conversation read result.
#[derive(Debug, Serialize)]
pub struct ReadChatResult {
    pub chat_id: String,
    pub with: String,
    pub messages: Vec<MessageRow>,
}

/// Contact flow result.
#[derive(Debug, Serialize)]
pub struct ContactResult {
    pub chat_id: String,
    pub with: String,
    pub sent: Option<MessageRow>,
}

/// List conversations for the session user.
pub async fn list_chats(session: &ChatSession) -> Result<ChatListResult> {
    session.refresh_conversations().await?;
    Ok(ChatListResult {
        chats: session.conversations().iter().map(ChatRow::from).collect(),
    })
}

/// Open a conversation by server id and return its messages.
pub async fn read_chat(session: &ChatSession, chat_id: &str) -> Result<ReadChatResult> {
    let conv = open_by_chat_id(session, chat_id).await?;

    session.refresh_messages().await?;
    session.mark_open_read().await;

    Ok(ReadChatResult {
        chat_id: chat_id.to_string(),
        with: conv.counterpart_name,
        messages: session.messages().iter().map(MessageRow::from).collect(),
    })
}

/// Send a message into a confirmed conversation.
pub async fn send_message(
    session: &ChatSession,
    chat_id: &str,
    text: &str,
) -> Result<MessageRow> {
    open_by_chat_id(session, chat_id).await?;

    let message = session.send(text).await?;
    Ok(MessageRow::from(&message))
}

/// Contact a counterpart about an advertisement: optimistic open, server
/// confirmation, optional first message.
pub async fn contact(
    session: &ChatSession,
    ad_id: &str,
    ad_title: &str,
    counterpart: &str,
    message: Option<&str>,
) -> Result<ContactResult> {
    let counterpart_id = UserId::new(counterpart);
    let cached_name = session.counterpart_name(&counterpart_id).await;

    let conv = session.contact(ad_id, ad_title, counterpart_id, cached_name.as_deref());
    let chat_id = session.confirm(&AdId::new(ad_id)).await?;

    let sent = match message {
        Some(text) => Some(MessageRow::from(&session.send(text).await?)),
        None => None,
    };

    Ok(ContactResult {
        chat_id: chat_id.to_string(),
        with: conv.counterpart_name,
        sent,
    })
}

/// Refresh the list and open the conversation carrying this server id.
async fn open_by_chat_id(session: &ChatSession, chat_id: &str) -> Result<Conversation> {
    session.refresh_conversations().await?;

    let conv = session
        .find_by_chat_id(&ChatId::new(chat_id))
        .with_context(|| format!("No conversation with id {chat_id}"))?;
    session.open(&conv.ad_id);
    Ok(conv)
}
