//! Notification Queue
//!
//! Fire-and-forget delivery of staff/manager messages. The core only
//! decides *that* a notification is warranted; delivery runs on a
//! background worker fed by an unbounded channel, and a failed or
//! dropped enqueue never affects committed state.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;

/// One outbound message to a staff member's chat
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    /// External messenger id of the recipient
    pub chat_id: i64,
    pub text: String,
}

/// Delivery backend for the notification worker
#[async_trait]
pub trait NotifySink: Send + Sync {
    async fn deliver(&self, notification: &Notification) -> anyhow::Result<()>;
}

/// Default sink: write the notification to the log only.
/// Used when no webhook is configured (development, tests).
pub struct LogSink;

#[async_trait]
impl NotifySink for LogSink {
    async fn deliver(&self, notification: &Notification) -> anyhow::Result<()> {
        tracing::info!(
            chat_id = notification.chat_id,
            text = %notification.text,
            "Notification (log sink)"
        );
        Ok(())
    }
}

/// POST notifications as JSON to the configured bot-platform webhook
pub struct WebhookSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl NotifySink for WebhookSink {
    async fn deliver(&self, notification: &Notification) -> anyhow::Result<()> {
        self.client
            .post(&self.url)
            .json(notification)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Handle for enqueueing notifications; cheap to clone
#[derive(Clone, Debug)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    /// Spawn the delivery worker and return the enqueue handle
    pub fn start(sink: Arc<dyn NotifySink>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();
        tokio::spawn(async move {
            while let Some(notification) = rx.recv().await {
                if let Err(e) = sink.deliver(&notification).await {
                    tracing::warn!(
                        chat_id = notification.chat_id,
                        error = %e,
                        "Notification delivery failed"
                    );
                }
            }
            tracing::debug!("Notification worker stopped");
        });
        Self { tx }
    }

    /// Enqueue a message. Best-effort: a closed queue is logged, never
    /// surfaced to the caller.
    pub fn notify(&self, chat_id: i64, text: impl Into<String>) {
        let notification = Notification {
            chat_id,
            text: text.into(),
        };
        if self.tx.send(notification).is_err() {
            tracing::warn!(chat_id, "Notification queue is closed, message dropped");
        }
    }
}
