//! Create vote index table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vote::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vote::ActorGuid).big_integer().not_null())
                    .col(ColumnDef::new(Vote::EntityGuid).big_integer().not_null())
                    .col(ColumnDef::new(Vote::Direction).string_len(8).not_null())
                    .col(
                        ColumnDef::new(Vote::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // A vote exists at most once per (actor, entity, direction)
                    .primary_key(
                        Index::create()
                            .name("pk_vote")
                            .col(Vote::ActorGuid)
                            .col(Vote::EntityGuid)
                            .col(Vote::Direction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_entity")
                            .from(Vote::Table, Vote::EntityGuid)
                            .to(Entity::Table, Entity::Guid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: entity_guid (for listing voters)
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_entity_guid")
                    .table(Vote::Table)
                    .col(Vote::EntityGuid)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vote::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Vote {
    Table,
    ActorGuid,
    EntityGuid,
    Direction,
    CreatedAt,
}

#[derive(Iden)]
enum Entity {
    Table,
    Guid,
}
