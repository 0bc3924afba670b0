// # Notifier Implementations
//
// This module provides implementations of the Notifier trait.
//
// Real delivery transports (SMTP, SES, webhooks) live behind the trait in
// their own crates; the implementations here cover local operation and
// tests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::Error;
use crate::traits::Notifier;

/// Notifier that emits each message as a structured log line.
///
/// The daemon's default: a changed zone is visible in the logs even when
/// no delivery transport is configured.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    /// Create a new log notifier
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(
        &self,
        recipient: &str,
        sender: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), Error> {
        info!(recipient, sender, subject, %body, "notification");
        Ok(())
    }
}

/// One message captured by [`MemoryNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipient: String,
    pub sender: String,
    pub subject: String,
    pub body: String,
}

/// Notifier that records every message in memory, for assertions in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    sent: Arc<Mutex<Vec<SentMessage>>>,
}

impl MemoryNotifier {
    /// Create a new empty memory notifier
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages sent so far, in order
    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn send(
        &self,
        recipient: &str,
        sender: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), Error> {
        self.sent.lock().await.push(SentMessage {
            recipient: recipient.to_string(),
            sender: sender.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_notifier_records_messages_in_order() {
        let notifier = MemoryNotifier::new();
        notifier.send("to@x", "from@x", "first", "a").await.unwrap();
        notifier.send("to@x", "from@x", "second", "b").await.unwrap();

        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].subject, "first");
        assert_eq!(sent[1].body, "b");
    }
}
