//! Roles and the permission flags they grant.

use serde::{Serialize, Serializer, ser::SerializeStruct};

/// Individual capabilities a role may grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    View,
    Vote,
    Remind,
    CreateComment,
    Subscribe,
    WireSend,
    CreatePost,
    EditPost,
    DeletePost,
    EditChannel,
    DeleteChannel,
    EditGroup,
    DeleteGroup,
    KickFromGroup,
    AppointModerator,
    AppointAdmin,
}

const INTERACT: &[Flag] = &[
    Flag::View,
    Flag::Vote,
    Flag::Remind,
    Flag::CreateComment,
    Flag::Subscribe,
    Flag::WireSend,
];

const CHANNEL_OWNER: &[Flag] = &[
    Flag::View,
    Flag::Vote,
    Flag::Remind,
    Flag::CreateComment,
    Flag::CreatePost,
    Flag::EditPost,
    Flag::DeletePost,
    Flag::EditChannel,
    Flag::DeleteChannel,
];

const GROUP_MODERATOR: &[Flag] = &[
    Flag::View,
    Flag::Vote,
    Flag::Remind,
    Flag::CreateComment,
    Flag::Subscribe,
    Flag::WireSend,
    Flag::CreatePost,
    Flag::DeletePost,
    Flag::KickFromGroup,
];

const GROUP_ADMIN: &[Flag] = &[
    Flag::View,
    Flag::Vote,
    Flag::Remind,
    Flag::CreateComment,
    Flag::Subscribe,
    Flag::WireSend,
    Flag::CreatePost,
    Flag::EditPost,
    Flag::DeletePost,
    Flag::EditGroup,
    Flag::KickFromGroup,
    Flag::AppointModerator,
];

const GROUP_OWNER: &[Flag] = &[
    Flag::View,
    Flag::Vote,
    Flag::Remind,
    Flag::CreateComment,
    Flag::Subscribe,
    Flag::WireSend,
    Flag::CreatePost,
    Flag::EditPost,
    Flag::DeletePost,
    Flag::EditGroup,
    Flag::DeleteGroup,
    Flag::KickFromGroup,
    Flag::AppointModerator,
    Flag::AppointAdmin,
];

const ADMIN: &[Flag] = &[
    Flag::View,
    Flag::Vote,
    Flag::Remind,
    Flag::CreateComment,
    Flag::Subscribe,
    Flag::WireSend,
    Flag::CreatePost,
    Flag::EditPost,
    Flag::DeletePost,
    Flag::EditChannel,
    Flag::DeleteChannel,
    Flag::EditGroup,
    Flag::DeleteGroup,
    Flag::KickFromGroup,
    Flag::AppointModerator,
    Flag::AppointAdmin,
];

/// A user's role relative to an entity, channel or group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Banned,
    ChannelOwner,
    ChannelSubscriber,
    ChannelNonSubscriber,
    GroupOwner,
    GroupAdmin,
    GroupModerator,
    GroupSubscriber,
    GroupNonSubscriber,
}

impl Role {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Banned => "banned",
            Self::ChannelOwner => "channel_owner",
            Self::ChannelSubscriber => "channel_subscriber",
            Self::ChannelNonSubscriber => "channel_nonsubscriber",
            Self::GroupOwner => "group_owner",
            Self::GroupAdmin => "group_admin",
            Self::GroupModerator => "group_moderator",
            Self::GroupSubscriber => "group_subscriber",
            Self::GroupNonSubscriber => "group_nonsubscriber",
        }
    }

    /// Flags granted by this role.
    #[must_use]
    pub const fn flags(&self) -> &'static [Flag] {
        match self {
            Self::Admin => ADMIN,
            Self::Banned => &[],
            Self::ChannelOwner => CHANNEL_OWNER,
            Self::GroupOwner => GROUP_OWNER,
            Self::GroupAdmin => GROUP_ADMIN,
            Self::GroupModerator => GROUP_MODERATOR,
            Self::ChannelSubscriber | Self::GroupSubscriber => INTERACT,
            Self::ChannelNonSubscriber | Self::GroupNonSubscriber => &[Flag::View, Flag::Vote, Flag::Subscribe],
        }
    }

    #[must_use]
    pub fn has(&self, flag: Flag) -> bool {
        self.flags().contains(&flag)
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Role", 2)?;
        s.serialize_field("name", self.name())?;
        s.serialize_field("permissions", self.flags())?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banned_has_no_flags() {
        assert!(!Role::Banned.has(Flag::View));
        assert!(Role::Banned.flags().is_empty());
    }

    #[test]
    fn test_owner_flags() {
        assert!(Role::GroupOwner.has(Flag::AppointAdmin));
        assert!(!Role::GroupAdmin.has(Flag::AppointAdmin));
        assert!(Role::ChannelOwner.has(Flag::DeleteChannel));
        assert!(!Role::ChannelSubscriber.has(Flag::EditPost));
    }

    #[test]
    fn test_serializes_name_and_permissions() {
        let value = serde_json::to_value(Role::ChannelNonSubscriber).unwrap_or_default();
        assert_eq!(value["name"], "channel_nonsubscriber");
        assert_eq!(value["permissions"], serde_json::json!(["view", "vote", "subscribe"]));
    }
}
