//! Role calculators for channel-scoped and group-scoped entities.

use std::collections::BTreeMap;

use minds_common::{AppError, AppResult};
use minds_db::{
    entities::{entity, group_member::GroupRole, user},
    repositories::{GroupRepository, SubscriptionRepository},
};

use super::roles::Role;

/// Resolves the user's role on the channel that owns an entity.
#[derive(Clone)]
pub struct ChannelRoleCalculator {
    subscriptions: SubscriptionRepository,
    channels: BTreeMap<i64, Role>,
}

impl ChannelRoleCalculator {
    #[must_use]
    pub const fn new(subscriptions: SubscriptionRepository) -> Self {
        Self {
            subscriptions,
            channels: BTreeMap::new(),
        }
    }

    pub async fn calculate(&mut self, user: &user::Model, entity: &entity::Model) -> AppResult<Role> {
        if let Some(role) = self.channels.get(&entity.owner_guid) {
            return Ok(*role);
        }

        let role = if entity.owner_guid == user.guid {
            Role::ChannelOwner
        } else if self
            .subscriptions
            .is_subscribed(user.guid, entity.owner_guid)
            .await?
        {
            Role::ChannelSubscriber
        } else {
            Role::ChannelNonSubscriber
        };

        self.channels.insert(entity.owner_guid, role);
        Ok(role)
    }

    /// Roles computed so far, keyed by channel guid.
    #[must_use]
    pub const fn channels(&self) -> &BTreeMap<i64, Role> {
        &self.channels
    }
}

/// Resolves the user's role in the group an entity was posted to.
#[derive(Clone)]
pub struct GroupRoleCalculator {
    groups_repo: GroupRepository,
    groups: BTreeMap<i64, Role>,
}

impl GroupRoleCalculator {
    #[must_use]
    pub const fn new(groups_repo: GroupRepository) -> Self {
        Self {
            groups_repo,
            groups: BTreeMap::new(),
        }
    }

    pub async fn calculate(&mut self, user: &user::Model, group_guid: i64) -> AppResult<Role> {
        if let Some(role) = self.groups.get(&group_guid) {
            return Ok(*role);
        }

        let group = self
            .groups_repo
            .find_by_guid(group_guid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group {group_guid} not found")))?;

        let role = if group.owner_guid == user.guid {
            Role::GroupOwner
        } else {
            match self.groups_repo.find_member(group_guid, user.guid).await? {
                Some(member) if member.is_banned => Role::Banned,
                Some(member) => match member.role {
                    GroupRole::Owner => Role::GroupOwner,
                    GroupRole::Admin => Role::GroupAdmin,
                    GroupRole::Moderator => Role::GroupModerator,
                    GroupRole::Member => Role::GroupSubscriber,
                },
                None => Role::GroupNonSubscriber,
            }
        };

        self.groups.insert(group_guid, role);
        Ok(role)
    }

    /// Roles computed so far, keyed by group guid.
    #[must_use]
    pub const fn groups(&self) -> &BTreeMap<i64, Role> {
        &self.groups
    }
}
