//! Queue client abstraction.
//!
//! The concrete implementation lives in the queue crate (apalis + Redis).

use async_trait::async_trait;
use minds_common::AppResult;
use serde_json::{Value, json};
use std::sync::Arc;

/// Messages sent to background queues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueMessage {
    /// Send the confirmation email to a user.
    ConfirmationEmail { user_guid: String },
    /// Send the welcome email after confirmation.
    WelcomeEmail { user_guid: String },
    /// Download and import a YouTube video.
    YouTubeImport { video_guid: i64, owner_guid: i64 },
}

impl QueueMessage {
    /// Name of the queue this message is delivered to.
    #[must_use]
    pub const fn queue_name(&self) -> &'static str {
        match self {
            Self::ConfirmationEmail { .. } => "ConfirmationEmail",
            Self::WelcomeEmail { .. } => "WelcomeEmail",
            Self::YouTubeImport { .. } => "YouTubeImporter",
        }
    }

    /// Key-value payload carried by the message.
    #[must_use]
    pub fn payload(&self) -> Value {
        match self {
            Self::ConfirmationEmail { user_guid } | Self::WelcomeEmail { user_guid } => {
                json!({ "user_guid": user_guid })
            }
            Self::YouTubeImport {
                video_guid,
                owner_guid,
            } => json!({
                "video_guid": video_guid.to_string(),
                "owner_guid": owner_guid.to_string(),
            }),
        }
    }
}

/// Trait for sending messages to background queues.
#[async_trait]
pub trait QueueClient: Send + Sync {
    async fn send(&self, message: QueueMessage) -> AppResult<()>;
}

/// Shared queue client handle.
pub type QueueClientService = Arc<dyn QueueClient>;

/// Discards every message. Used when no queue backend is configured.
#[derive(Clone, Default)]
pub struct NoOpQueueClient;

#[async_trait]
impl QueueClient for NoOpQueueClient {
    async fn send(&self, message: QueueMessage) -> AppResult<()> {
        tracing::debug!(queue = message.queue_name(), "Queue disabled, dropping message");
        Ok(())
    }
}
