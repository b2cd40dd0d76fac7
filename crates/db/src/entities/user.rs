//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub guid: i64,

    #[sea_orm(unique)]
    pub username: String,

    /// Display name
    #[sea_orm(nullable)]
    pub name: Option<String>,

    pub email: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password: String,

    /// Access token for API authentication
    #[sea_orm(unique, nullable)]
    #[serde(skip_serializing)]
    pub token: Option<String>,

    #[sea_orm(default_value = false)]
    pub is_admin: bool,

    #[sea_orm(default_value = false)]
    pub is_banned: bool,

    /// Soft-deleted channel
    #[sea_orm(default_value = false)]
    pub is_deleted: bool,

    /// Pending confirmation JWT, cleared once consumed
    #[sea_orm(column_type = "Text", nullable)]
    #[serde(skip_serializing)]
    pub email_confirmation_token: Option<String>,

    #[sea_orm(nullable)]
    pub email_confirmed_at: Option<DateTimeWithTimeZone>,

    /// Has a connected payments merchant account
    #[sea_orm(default_value = false)]
    pub merchant: bool,

    /// Custom domain for Pro channels
    #[sea_orm(unique, nullable)]
    pub pro_domain: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Whether the user has confirmed their email address.
    #[must_use]
    pub const fn is_email_confirmed(&self) -> bool {
        self.email_confirmed_at.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::entity::Entity")]
    Entities,
}

impl Related<super::entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
