//! Interval-driven refresh tasks.
//!
//! Both refresh loops are tasks owned by a [`ChatPoller`]. Stopping the
//! poller (or dropping it) aborts them, so no timer survives the view it
//! belongs to.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::ChatSession;

/// Poll intervals for the two refresh loops.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Conversation list refresh interval.
    pub list_interval: Duration,
    /// Open-conversation message refresh interval.
    pub message_interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            list_interval: Duration::from_secs(15),
            message_interval: Duration::from_secs(4),
        }
    }
}

/// Owner of the background refresh tasks for one session.
pub struct ChatPoller {
    config: PollerConfig,
    list_task: Option<JoinHandle<()>>,
    message_task: Option<JoinHandle<()>>,
}

impl ChatPoller {
    /// Create a poller with the given intervals.
    pub fn new(config: PollerConfig) -> Self {
        Self {
            config,
            list_task: None,
            message_task: None,
        }
    }

    /// Start the conversation list loop.
    ///
    /// Ticks are skipped while a conversation is open, so an active reading
    /// view is not disturbed by wholesale list replacement. The initial
    /// fetch is the caller's; the loop waits one full interval first.
    pub fn start_list(&mut self, session: Arc<ChatSession>) {
        self.stop_list();
        let every = self.config.list_interval;
        self.list_task = Some(tokio::spawn(async move {
            let mut timer = interval(every);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            timer.tick().await;
            loop {
                timer.tick().await;
                if !session.is_open() {
                    let _ = session.refresh_conversations().await;
                }
            }
        }));
    }

    /// Start the message loop for the open conversation.
    ///
    /// Fetches only while the conversation is open and confirmed; a pending
    /// conversation has no identifier to query against. The loop ends when
    /// the conversation is closed. Starting a new watch aborts the previous
    /// one, so at most one message timer exists at a time.
    pub fn watch_messages(&mut self, session: Arc<ChatSession>) {
        self.stop_messages();
        let every = self.config.message_interval;
        self.message_task = Some(tokio::spawn(async move {
            let mut timer = interval(every);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            timer.tick().await;
            loop {
                timer.tick().await;
                if !session.is_open() {
                    break;
                }
                if session.open_chat_id().is_some() {
                    let _ = session.refresh_messages().await;
                }
            }
        }));
    }

    /// Stop the list loop.
    pub fn stop_list(&mut self) {
        if let Some(task) = self.list_task.take() {
            task.abort();
        }
    }

    /// Stop the message loop.
    pub fn stop_messages(&mut self) {
        if let Some(task) = self.message_task.take() {
            task.abort();
        }
    }

    /// Stop both loops.
    pub fn stop(&mut self) {
        self.stop_list();
        self.stop_messages();
    }

    /// Whether the message loop is still running.
    pub fn messages_active(&self) -> bool {
        self.message_task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for ChatPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdId, Role};
    use crate::session::testing::MockTransport;
    use crate::session::ChatSession;

    fn open_confirmed_session(mock: &Arc<MockTransport>) -> Arc<ChatSession> {
        let session = Arc::new(ChatSession::new(mock.clone(), 12i64, Role::Buyer));
        session.contact(42i64, "Mountain bike", 7i64, None);
        session
    }

    fn short_config() -> PollerConfig {
        PollerConfig {
            list_interval: Duration::from_millis(20),
            message_interval: Duration::from_millis(20),
        }
    }

    #[tokio::test]
    async fn test_message_polling_runs_while_open_and_confirmed() {
        let mock = Arc::new(MockTransport::new());
        let session = open_confirmed_session(&mock);
        session.confirm(&AdId::from(42i64)).await.unwrap();

        let mut poller = ChatPoller::new(short_config());
        poller.watch_messages(session.clone());

        tokio::time::sleep(Duration::from_millis(90)).await;
        assert!(mock.calls_matching("messages:") >= 2);
    }

    #[tokio::test]
    async fn test_no_message_polling_while_pending() {
        let mock = Arc::new(MockTransport::new());
        let session = open_confirmed_session(&mock);

        let mut poller = ChatPoller::new(short_config());
        poller.watch_messages(session.clone());

        tokio::time::sleep(Duration::from_millis(90)).await;
        assert_eq!(mock.calls_matching("messages:"), 0);
    }

    #[tokio::test]
    async fn test_closing_stops_message_polling() {
        let mock = Arc::new(MockTransport::new());
        let session = open_confirmed_session(&mock);
        session.confirm(&AdId::from(42i64)).await.unwrap();

        let mut poller = ChatPoller::new(short_config());
        poller.watch_messages(session.clone());
        tokio::time::sleep(Duration::from_millis(50)).await;

        session.close();
        tokio::time::sleep(Duration::from_millis(30)).await;
        let after_close = mock.calls_matching("messages:");

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(mock.calls_matching("messages:"), after_close);
        assert!(!poller.messages_active());
    }

    #[tokio::test]
    async fn test_list_polling_pauses_while_open() {
        let mock = Arc::new(MockTransport::new());
        let session = open_confirmed_session(&mock);

        let mut poller = ChatPoller::new(short_config());
        poller.start_list(session.clone());

        tokio::time::sleep(Duration::from_millis(70)).await;
        assert_eq!(mock.calls_matching("list"), 0);

        session.close();
        tokio::time::sleep(Duration::from_millis(70)).await;
        assert!(mock.calls_matching("list") >= 1);
    }

    #[tokio::test]
    async fn test_stop_aborts_tasks() {
        let mock = Arc::new(MockTransport::new());
        let session = open_confirmed_session(&mock);
        session.confirm(&AdId::from(42i64)).await.unwrap();

        let mut poller = ChatPoller::new(short_config());
        poller.watch_messages(session.clone());
        poller.stop();

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(!poller.messages_active());
    }
}
