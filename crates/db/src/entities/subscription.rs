//! Channel subscription entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscription")]
pub struct Model {
    /// The subscribing user.
    #[sea_orm(primary_key, auto_increment = false)]
    pub subscriber_guid: i64,

    /// The channel being subscribed to.
    #[sea_orm(primary_key, auto_increment = false)]
    pub publisher_guid: i64,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SubscriberGuid",
        to = "super::user::Column::Guid",
        on_delete = "Cascade"
    )]
    Subscriber,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::PublisherGuid",
        to = "super::user::Column::Guid",
        on_delete = "Cascade"
    )]
    Publisher,
}

impl ActiveModelBehavior for ActiveModel {}
