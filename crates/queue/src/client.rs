//! Redis-backed queue client.
//!
//! Implements the core `QueueClient` trait by pushing typed jobs into
//! apalis Redis storages, one storage per queue.

use apalis::prelude::*;
use apalis_redis::RedisStorage;
use async_trait::async_trait;
use minds_common::{AppError, AppResult};
use minds_core::{QueueClient, QueueMessage};
use redis::aio::ConnectionManager;
use serde::{Serialize, de::DeserializeOwned};

use crate::jobs::{ConfirmationEmailJob, WelcomeEmailJob, YouTubeImportJob};

/// A queue message converted to its job type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutedJob {
    ConfirmationEmail(ConfirmationEmailJob),
    WelcomeEmail(WelcomeEmailJob),
    YouTubeImport(YouTubeImportJob),
}

impl From<QueueMessage> for RoutedJob {
    fn from(message: QueueMessage) -> Self {
        match message {
            QueueMessage::ConfirmationEmail { user_guid } => {
                Self::ConfirmationEmail(ConfirmationEmailJob { user_guid })
            }
            QueueMessage::WelcomeEmail { user_guid } => {
                Self::WelcomeEmail(WelcomeEmailJob { user_guid })
            }
            QueueMessage::YouTubeImport {
                video_guid,
                owner_guid,
            } => Self::YouTubeImport(YouTubeImportJob::new(video_guid, owner_guid)),
        }
    }
}

/// Storage for one queue, namespaced by its wire name.
fn storage<T>(conn: ConnectionManager, queue: &str) -> RedisStorage<T>
where
    T: Serialize + DeserializeOwned,
{
    RedisStorage::new_with_config(conn, apalis_redis::Config::default().set_namespace(queue))
}

/// Redis-backed queue client.
#[derive(Clone)]
pub struct RedisQueueClient {
    confirmation_email: RedisStorage<ConfirmationEmailJob>,
    welcome_email: RedisStorage<WelcomeEmailJob>,
    youtube_import: RedisStorage<YouTubeImportJob>,
}

impl RedisQueueClient {
    /// Create storages for every queue over a shared connection.
    #[must_use]
    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            confirmation_email: storage(conn.clone(), "ConfirmationEmail"),
            welcome_email: storage(conn.clone(), "WelcomeEmail"),
            youtube_import: storage(conn, "YouTubeImporter"),
        }
    }

    /// Storage the YouTube importer worker consumes.
    #[must_use]
    pub fn youtube_import_storage(&self) -> RedisStorage<YouTubeImportJob> {
        self.youtube_import.clone()
    }
}

fn queue_error(queue: &str, e: impl std::fmt::Display) -> AppError {
    AppError::Queue(format!("Failed to queue {queue} job: {e}"))
}

#[async_trait]
impl QueueClient for RedisQueueClient {
    async fn send(&self, message: QueueMessage) -> AppResult<()> {
        let queue = message.queue_name();

        match RoutedJob::from(message) {
            RoutedJob::ConfirmationEmail(job) => {
                self.confirmation_email
                    .clone()
                    .push(job)
                    .await
                    .map_err(|e| queue_error(queue, e))?;
            }
            RoutedJob::WelcomeEmail(job) => {
                self.welcome_email
                    .clone()
                    .push(job)
                    .await
                    .map_err(|e| queue_error(queue, e))?;
            }
            RoutedJob::YouTubeImport(job) => {
                self.youtube_import
                    .clone()
                    .push(job)
                    .await
                    .map_err(|e| queue_error(queue, e))?;
            }
        }

        tracing::debug!(queue, "Queued job");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_route_to_their_jobs() {
        let routed = RoutedJob::from(QueueMessage::ConfirmationEmail {
            user_guid: "5".to_string(),
        });
        assert_eq!(
            routed,
            RoutedJob::ConfirmationEmail(ConfirmationEmailJob {
                user_guid: "5".to_string()
            })
        );

        let routed = RoutedJob::from(QueueMessage::YouTubeImport {
            video_guid: 20,
            owner_guid: 2,
        });
        assert_eq!(routed, RoutedJob::YouTubeImport(YouTubeImportJob::new(20, 2)));
    }
}
