//! Access control checks.
//!
//! Elevated access is expressed with an explicit [`AclContext`] value passed
//! to the check, never with process-wide state.

use async_trait::async_trait;
use minds_common::{AppError, AppResult};
use minds_db::entities::{entity, user};
use std::sync::Arc;
use tracing::debug;

/// Per-call access control context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AclContext {
    bypass: bool,
}

impl AclContext {
    /// Regular checks.
    #[must_use]
    pub const fn standard() -> Self {
        Self { bypass: false }
    }

    /// Skip ownership checks for the single operation this value is passed to.
    #[must_use]
    pub const fn bypass() -> Self {
        Self { bypass: true }
    }

    #[must_use]
    pub const fn is_bypassed(&self) -> bool {
        self.bypass
    }
}

/// Access control decisions between actors and entities.
#[async_trait]
pub trait Acl: Send + Sync {
    /// Whether `actor` may perform `action` (e.g. `voteup`) on `entity`.
    ///
    /// Returns an error instead of `false` when the actor must take an action
    /// first, such as confirming their email.
    async fn interact(
        &self,
        entity: &entity::Model,
        actor: &user::Model,
        action: &str,
    ) -> AppResult<bool>;

    /// Whether `actor` may modify `entity`.
    async fn write(
        &self,
        entity: &entity::Model,
        actor: &user::Model,
        ctx: &AclContext,
    ) -> AppResult<bool>;
}

/// Shared ACL handle.
pub type AclHandle = Arc<dyn Acl>;

/// Default ACL rules backed by user state.
#[derive(Clone, Default)]
pub struct AclService;

impl AclService {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Acl for AclService {
    async fn interact(
        &self,
        entity: &entity::Model,
        actor: &user::Model,
        action: &str,
    ) -> AppResult<bool> {
        if actor.is_banned || actor.is_deleted {
            debug!(actor = actor.guid, entity = entity.guid, action, "Actor is banned or deleted");
            return Ok(false);
        }

        if !actor.is_email_confirmed() {
            return Err(AppError::UnverifiedEmail);
        }

        Ok(true)
    }

    async fn write(
        &self,
        entity: &entity::Model,
        actor: &user::Model,
        ctx: &AclContext,
    ) -> AppResult<bool> {
        if ctx.is_bypassed() {
            return Ok(true);
        }

        if actor.is_banned || actor.is_deleted {
            return Ok(false);
        }

        Ok(actor.is_admin || entity.owner_guid == actor.guid)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_fixtures::{confirmed_user, entity, user};

    #[tokio::test]
    async fn test_interact_requires_confirmed_email() {
        let acl = AclService::new();
        let result = acl.interact(&entity(10, 2, "2"), &user(1), "voteup").await;

        assert!(matches!(result, Err(AppError::UnverifiedEmail)));
    }

    #[tokio::test]
    async fn test_interact_denies_banned() {
        let acl = AclService::new();
        let mut actor = confirmed_user(1);
        actor.is_banned = true;

        assert!(!acl.interact(&entity(10, 2, "2"), &actor, "voteup").await.unwrap());
    }

    #[tokio::test]
    async fn test_interact_allows_confirmed() {
        let acl = AclService::new();
        assert!(acl
            .interact(&entity(10, 2, "2"), &confirmed_user(1), "votedown")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_write_owner_only_without_bypass() {
        let acl = AclService::new();
        let ctx = AclContext::standard();

        assert!(acl.write(&entity(10, 1, "2"), &user(1), &ctx).await.unwrap());
        assert!(!acl.write(&entity(10, 2, "2"), &user(1), &ctx).await.unwrap());
    }

    #[tokio::test]
    async fn test_write_bypass_is_scoped_to_value() {
        let acl = AclService::new();
        let stranger = user(1);
        let target = entity(10, 2, "2");

        assert!(acl.write(&target, &stranger, &AclContext::bypass()).await.unwrap());
        assert!(!acl
            .write(&target, &stranger, &AclContext::default())
            .await
            .unwrap());
    }
}
