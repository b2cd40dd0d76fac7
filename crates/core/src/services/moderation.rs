//! Admin moderation: NSFW flagging.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use minds_common::{AppError, AppResult};
use minds_db::{
    entities::{entity, entity::EntityType, user},
    repositories::{EntityRepository, UserRepository},
};
use sea_orm::Set;
use serde_json::json;
use tracing::{error, info, warn};

use crate::services::events::{DomainEvent, EventDispatcherService};

/// Connected payments accounts of merchant channels.
#[async_trait]
pub trait PaymentsConnect: Send + Sync {
    /// Whether a payments provider is behind this handle.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Remove the connected merchant account of a user.
    async fn remove_merchant(&self, user: &user::Model) -> AppResult<()>;
}

/// Shared payments handle.
pub type PaymentsConnectService = Arc<dyn PaymentsConnect>;

/// Used when no payments provider is configured.
#[derive(Clone, Default)]
pub struct NoOpPaymentsConnect;

#[async_trait]
impl PaymentsConnect for NoOpPaymentsConnect {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn remove_merchant(&self, _user: &user::Model) -> AppResult<()> {
        Ok(())
    }
}

/// NSFW moderation.
#[derive(Clone)]
pub struct NsfwService {
    entity_repo: EntityRepository,
    user_repo: UserRepository,
    dispatcher: EventDispatcherService,
    payments: PaymentsConnectService,
}

impl NsfwService {
    #[must_use]
    pub fn new(
        entity_repo: EntityRepository,
        user_repo: UserRepository,
        dispatcher: EventDispatcherService,
        payments: PaymentsConnectService,
    ) -> Self {
        Self {
            entity_repo,
            user_repo,
            dispatcher,
            payments,
        }
    }

    /// Set and lock the NSFW reasons of an entity and of its child entity,
    /// re-index both, and drop the merchant account of flagged merchant channels.
    pub async fn mark(&self, guid: i64, reasons: &[i32]) -> AppResult<entity::Model> {
        if guid == 0 {
            return Err(AppError::BadRequest("You must send a GUID.".to_string()));
        }

        let entity = self
            .entity_repo
            .find_by_guid(guid)
            .await?
            .ok_or_else(|| AppError::NotFound("Entity not found.".to_string()))?;

        let child_guid = entity.entity_guid;
        let is_user = entity.entity_type == EntityType::User;
        let updated = self.apply(entity, reasons).await?;

        if let Some(child_guid) = child_guid {
            if let Some(child) = self.entity_repo.find_by_guid(child_guid).await? {
                self.apply(child, reasons).await?;
            }
        }

        if is_user {
            if let Some(user) = self.user_repo.find_by_guid(guid).await? {
                if user.merchant && !self.payments.is_enabled() {
                    warn!(
                        user = user.guid,
                        "Merchant channel flagged while payments are disabled, merchant account kept"
                    );
                } else if user.merchant {
                    self.payments.remove_merchant(&user).await.map_err(|e| {
                        error!(user = user.guid, error = %e, "Error removing merchant");
                        AppError::ExternalService("Failed to remove merchant for stripe.".to_string())
                    })?;
                }
            }
        }

        info!(guid, reasons = ?reasons, "Entity marked NSFW");
        Ok(updated)
    }

    async fn apply(&self, entity: entity::Model, reasons: &[i32]) -> AppResult<entity::Model> {
        let mut active: entity::ActiveModel = entity.into();
        active.nsfw = Set(json!(reasons));
        active.nsfw_lock = Set(json!(reasons));
        active.time_updated = Set(Some(Utc::now().into()));
        let saved = self.entity_repo.update(active).await?;

        self.dispatcher
            .trigger(DomainEvent::SearchIndex {
                entity: saved.clone(),
                immediate: true,
            })
            .await?;

        Ok(saved)
    }
}
