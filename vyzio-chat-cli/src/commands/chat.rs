//! Chat commands.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use vyzio_chat::{ChatPoller, ChatSession, PollerConfig};

use crate::config::build_authed_client;
use crate::handlers::chat as handlers;
use crate::handlers::chat::MessageRow;
use crate::output::{print_table, OutputFormat, PlainPrint};

#[derive(Subcommand)]
pub enum ChatAction {
    /// List conversations
    #[command(alias = "ls")]
    List,

    /// View messages in a conversation
    Read {
        /// Conversation ID
        chat_id: String,
    },

    /// Send a message into a conversation
    Send {
        /// Conversation ID
        chat_id: String,
        /// Message text
        text: String,
    },

    /// Start (or resume) a conversation about an advertisement
    Contact {
        /// Advertisement ID
        ad_id: String,
        /// Counterpart user ID (the seller when contacting as a buyer)
        #[arg(short, long)]
        seller: String,
        /// Advertisement title shown in the conversation list
        #[arg(short, long, default_value = "")]
        title: String,
        /// First message to send once the conversation is confirmed
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Follow a conversation, printing new messages as they arrive
    Watch {
        /// Conversation ID
        chat_id: String,
        /// Poll interval in seconds
        #[arg(short, long, default_value = "4")]
        interval: u64,
    },
}

pub async fn handle(action: ChatAction, format: OutputFormat, _verbose: bool) -> Result<()> {
    match action {
        ChatAction::List => list_chats(format).await,
        ChatAction::Read { chat_id } => read_chat(&chat_id, format).await,
        ChatAction::Send { chat_id, text } => send_message(&chat_id, &text, format).await,
        ChatAction::Contact {
            ad_id,
            seller,
            title,
            message,
        } => contact(&ad_id, &title, &seller, message.as_deref(), format).await,
        ChatAction::Watch { chat_id, interval } => watch_chat(&chat_id, interval).await,
    }
}

fn build_session() -> Result<Arc<ChatSession>> {
    let (client, auth) = build_authed_client()?;
    Ok(handlers::session_from(client, &auth))
}

async fn list_chats(format: OutputFormat) -> Result<()> {
    let session = build_session()?;
    let result = handlers::list_chats(&session).await?;

    print_table(result.chats, format);
    Ok(())
}

async fn read_chat(chat_id: &str, format: OutputFormat) -> Result<()> {
    let session = build_session()?;
    let result = handlers::read_chat(&session, chat_id).await?;

    if matches!(format, OutputFormat::Plain) {
        println!("Conversation with {}\n", result.with.green());
    }

    print_table(result.messages, format);
    Ok(())
}

async fn send_message(chat_id: &str, text: &str, format: OutputFormat) -> Result<()> {
    let session = build_session()?;
    let sent = handlers::send_message(&session, chat_id, text).await?;

    if matches!(format, OutputFormat::Plain) {
        println!("Message sent to chat {}", chat_id.cyan());
    } else {
        print_table(vec![sent], format);
    }
    Ok(())
}

async fn contact(
    ad_id: &str,
    title: &str,
    counterpart: &str,
    message: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let session = build_session()?;
    let result = handlers::contact(&session, ad_id, title, counterpart, message).await?;

    if matches!(format, OutputFormat::Plain) {
        println!(
            "Conversation {} with {} is ready",
            result.chat_id.cyan(),
            result.with.green()
        );
        if result.sent.is_some() {
            println!("First message sent");
        }
    } else if let Some(sent) = result.sent {
        print_table(vec![sent], format);
    }
    Ok(())
}

/// Follow a conversation until Ctrl-C, printing messages beyond what has
/// already been shown on each poll.
async fn watch_chat(chat_id: &str, interval: u64) -> Result<()> {
    let session = build_session()?;
    let initial = handlers::read_chat(&session, chat_id).await?;

    println!(
        "Watching conversation with {} (Ctrl-C to stop)\n",
        initial.with.green()
    );
    for row in &initial.messages {
        row.plain_print();
    }
    let mut seen = initial.messages.len();

    let mut poller = ChatPoller::new(PollerConfig {
        message_interval: Duration::from_secs(interval.max(1)),
        ..PollerConfig::default()
    });
    poller.watch_messages(Arc::clone(&session));

    let mut print_tick = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = print_tick.tick() => {
                let messages = session.messages();
                if messages.len() > seen {
                    for m in &messages[seen..] {
                        MessageRow::from(m).plain_print();
                    }
                    seen = messages.len();
                    session.mark_open_read().await;
                }
            }
        }
    }

    poller.stop();
    session.close();
    Ok(())
}
