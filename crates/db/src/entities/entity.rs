//! Generic content entity (activities, objects, comments, groups).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Top-level entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    #[sea_orm(string_value = "activity")]
    Activity,
    #[sea_orm(string_value = "object")]
    Object,
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "group")]
    Group,
    #[sea_orm(string_value = "comment")]
    Comment,
}

impl EntityType {
    /// Wire name used by the search index.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Object => "object",
            Self::User => "user",
            Self::Group => "group",
            Self::Comment => "comment",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "entity")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub guid: i64,

    #[sea_orm(indexed)]
    pub entity_type: EntityType,

    /// e.g. `video`, `image`, `blog`
    #[sea_orm(nullable)]
    pub subtype: Option<String>,

    #[sea_orm(indexed)]
    pub owner_guid: i64,

    /// `0` unlisted, `1` logged-in, `2` public, `3` unknown, otherwise a group guid.
    pub access_id: String,

    /// Attached child entity (e.g. the image behind a remind)
    #[sea_orm(nullable)]
    pub entity_guid: Option<i64>,

    /// NSFW reason ids
    #[sea_orm(column_type = "JsonBinary")]
    pub nsfw: Json,

    /// NSFW reason ids locked by an admin
    #[sea_orm(column_type = "JsonBinary")]
    pub nsfw_lock: Json,

    #[sea_orm(default_value = 0)]
    pub votes_up: i64,

    #[sea_orm(default_value = 0)]
    pub votes_down: i64,

    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,

    #[sea_orm(nullable)]
    pub title: Option<String>,

    #[sea_orm(nullable)]
    pub custom_type: Option<String>,

    #[sea_orm(nullable)]
    pub license: Option<String>,

    #[sea_orm(default_value = 1)]
    pub rating: i32,

    #[sea_orm(default_value = false)]
    pub pending: bool,

    /// Video transcoding status
    #[sea_orm(nullable)]
    pub transcoding_status: Option<String>,

    /// Source id for imported YouTube videos
    #[sea_orm(nullable)]
    pub youtube_id: Option<String>,

    pub time_created: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub time_updated: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// NSFW reason ids as integers, ignoring malformed values.
    #[must_use]
    pub fn nsfw_reasons(&self) -> Vec<i32> {
        self.nsfw
            .as_array()
            .map(|values| {
                values
                    .iter()
                    .filter_map(serde_json::Value::as_i64)
                    .filter_map(|v| i32::try_from(v).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerGuid",
        to = "super::user::Column::Guid",
        on_delete = "Cascade"
    )]
    Owner,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
