//! Subscription repository.

use std::sync::Arc;

use crate::entities::{Subscription, subscription};
use chrono::Utc;
use minds_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set,
    sea_query::OnConflict,
};

/// Subscription repository for database operations.
#[derive(Clone)]
pub struct SubscriptionRepository {
    db: Arc<DatabaseConnection>,
}

impl SubscriptionRepository {
    /// Create a new subscription repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check if a user is subscribed to a channel.
    pub async fn is_subscribed(&self, subscriber_guid: i64, publisher_guid: i64) -> AppResult<bool> {
        let row = Subscription::find_by_id((subscriber_guid, publisher_guid))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.is_some())
    }

    /// Subscribe a user to a channel.
    pub async fn subscribe(&self, subscriber_guid: i64, publisher_guid: i64) -> AppResult<()> {
        let model = subscription::ActiveModel {
            subscriber_guid: Set(subscriber_guid),
            publisher_guid: Set(publisher_guid),
            created_at: Set(Utc::now().into()),
        };

        Subscription::insert(model)
            .on_conflict(
                OnConflict::columns([
                    subscription::Column::SubscriberGuid,
                    subscription::Column::PublisherGuid,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Unsubscribe a user from a channel.
    pub async fn unsubscribe(&self, subscriber_guid: i64, publisher_guid: i64) -> AppResult<()> {
        Subscription::delete_by_id((subscriber_guid, publisher_guid))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Count subscribers of a channel.
    pub async fn count_subscribers(&self, publisher_guid: i64) -> AppResult<u64> {
        Subscription::find()
            .filter(subscription::Column::PublisherGuid.eq(publisher_guid))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
