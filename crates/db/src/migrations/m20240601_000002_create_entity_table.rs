//! Create entity table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Entity::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Entity::Guid).big_integer().not_null().primary_key())
                    .col(ColumnDef::new(Entity::EntityType).string_len(16).not_null())
                    .col(ColumnDef::new(Entity::Subtype).string_len(32))
                    .col(ColumnDef::new(Entity::OwnerGuid).big_integer().not_null())
                    .col(ColumnDef::new(Entity::AccessId).string_len(32).not_null())
                    .col(ColumnDef::new(Entity::EntityGuid).big_integer())
                    .col(
                        ColumnDef::new(Entity::Nsfw)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(Entity::NsfwLock)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(Entity::VotesUp).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Entity::VotesDown).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Entity::Message).text())
                    .col(ColumnDef::new(Entity::Title).string_len(512))
                    .col(ColumnDef::new(Entity::CustomType).string_len(32))
                    .col(ColumnDef::new(Entity::License).string_len(64))
                    .col(ColumnDef::new(Entity::Rating).integer().not_null().default(1))
                    .col(ColumnDef::new(Entity::Pending).boolean().not_null().default(false))
                    .col(ColumnDef::new(Entity::TranscodingStatus).string_len(32))
                    .col(ColumnDef::new(Entity::YoutubeId).string_len(32))
                    .col(
                        ColumnDef::new(Entity::TimeCreated)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Entity::TimeUpdated).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entity_owner")
                            .from(Entity::Table, Entity::OwnerGuid)
                            .to(User::Table, User::Guid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (owner_guid, time_created) for channel listings
        manager
            .create_index(
                Index::create()
                    .name("idx_entity_owner_time")
                    .table(Entity::Table)
                    .col(Entity::OwnerGuid)
                    .col(Entity::TimeCreated)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_entity_type")
                    .table(Entity::Table)
                    .col(Entity::EntityType)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Entity::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Entity {
    Table,
    Guid,
    EntityType,
    Subtype,
    OwnerGuid,
    AccessId,
    EntityGuid,
    Nsfw,
    NsfwLock,
    VotesUp,
    VotesDown,
    Message,
    Title,
    CustomType,
    License,
    Rating,
    Pending,
    TranscodingStatus,
    YoutubeId,
    TimeCreated,
    TimeUpdated,
}

#[derive(Iden)]
enum User {
    Table,
    Guid,
}
