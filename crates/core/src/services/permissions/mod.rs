//! Per-request permission evaluation.
//!
//! A [`Permissions`] value is built for one user and fed entities; each entity
//! is routed to the channel or group calculator by its access scope, then the
//! user's global admin and banned flags are applied on top.

mod calculators;
mod roles;

pub use calculators::{ChannelRoleCalculator, GroupRoleCalculator};
pub use roles::{Flag, Role};

use std::collections::BTreeMap;

use minds_common::{AppError, AppResult};
use minds_db::{
    entities::{entity, user},
    repositories::{EntityRepository, GroupRepository, SubscriptionRepository},
};
use serde_json::{Value, json};
use tracing::debug;

use crate::services::search::mappings::export_user;

/// Visibility class of an entity, derived from its `access_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    Unlisted,
    LoggedIn,
    Public,
    Unknown,
    /// Posted into the group with this guid.
    Group(i64),
}

impl AccessScope {
    /// Parse an `access_id`. Missing or non-numeric ids are an error.
    pub fn parse(access_id: &str) -> AppResult<Self> {
        let id: i64 = access_id.trim().parse().map_err(|_| {
            AppError::Internal(format!("Entity has no valid access id: {access_id:?}"))
        })?;

        Ok(match id {
            0 => Self::Unlisted,
            1 => Self::LoggedIn,
            2 => Self::Public,
            3 => Self::Unknown,
            guid => Self::Group(guid),
        })
    }
}

/// Roles of one user over a set of entities.
pub struct Permissions {
    user: user::Model,
    is_admin: bool,
    is_banned: bool,
    channel_calculator: ChannelRoleCalculator,
    group_calculator: GroupRoleCalculator,
    entities: BTreeMap<i64, Role>,
}

impl Permissions {
    /// The user is fixed for the lifetime of this value.
    #[must_use]
    pub fn new(
        user: user::Model,
        subscriptions: SubscriptionRepository,
        groups: GroupRepository,
    ) -> Self {
        Self {
            is_admin: user.is_admin,
            is_banned: user.is_banned,
            user,
            channel_calculator: ChannelRoleCalculator::new(subscriptions),
            group_calculator: GroupRoleCalculator::new(groups),
            entities: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn user(&self) -> &user::Model {
        &self.user
    }

    /// Compute and record the user's role for each entity.
    pub async fn calculate(&mut self, entities: &[entity::Model]) -> AppResult<()> {
        for entity in entities {
            let role = self.role_for(entity).await?;
            self.entities.insert(entity.guid, role);
        }
        Ok(())
    }

    async fn role_for(&mut self, entity: &entity::Model) -> AppResult<Role> {
        let mut role = match AccessScope::parse(&entity.access_id)? {
            AccessScope::Unlisted
            | AccessScope::LoggedIn
            | AccessScope::Public
            | AccessScope::Unknown => self.channel_calculator.calculate(&self.user, entity).await?,
            AccessScope::Group(guid) => self.group_calculator.calculate(&self.user, guid).await?,
        };

        if self.is_admin {
            role = Role::Admin;
        }
        // Checked last: banned wins over admin.
        if self.is_banned {
            role = Role::Banned;
        }

        Ok(role)
    }

    /// Role recorded for an entity, if it was calculated.
    #[must_use]
    pub fn role(&self, entity_guid: i64) -> Option<Role> {
        self.entities.get(&entity_guid).copied()
    }

    #[must_use]
    pub const fn entities(&self) -> &BTreeMap<i64, Role> {
        &self.entities
    }

    #[must_use]
    pub const fn channels(&self) -> &BTreeMap<i64, Role> {
        self.channel_calculator.channels()
    }

    #[must_use]
    pub const fn groups(&self) -> &BTreeMap<i64, Role> {
        self.group_calculator.groups()
    }

    /// Nested export: user, channels, groups and entities.
    #[must_use]
    pub fn export(&self) -> Value {
        json!({
            "user": export_user(&self.user),
            "channels": self.channels(),
            "groups": self.groups(),
            "entities": self.entities,
        })
    }
}

/// Builds [`Permissions`] for request handlers.
#[derive(Clone)]
pub struct PermissionsService {
    entity_repo: EntityRepository,
    subscriptions: SubscriptionRepository,
    groups: GroupRepository,
}

impl PermissionsService {
    #[must_use]
    pub const fn new(
        entity_repo: EntityRepository,
        subscriptions: SubscriptionRepository,
        groups: GroupRepository,
    ) -> Self {
        Self {
            entity_repo,
            subscriptions,
            groups,
        }
    }

    #[must_use]
    pub fn for_user(&self, user: user::Model) -> Permissions {
        Permissions::new(user, self.subscriptions.clone(), self.groups.clone())
    }

    /// Load entities by guid and export the user's permissions over them.
    pub async fn entities(&self, user: user::Model, guids: &[i64]) -> AppResult<Value> {
        let entities = self.entity_repo.find_by_guids(guids).await?;
        debug!(user = user.guid, requested = guids.len(), found = entities.len(), "Calculating permissions");

        let mut permissions = self.for_user(user);
        permissions.calculate(&entities).await?;
        Ok(permissions.export())
    }
}
