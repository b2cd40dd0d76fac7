//! Create subscription table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscription::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Subscription::SubscriberGuid).big_integer().not_null())
                    .col(ColumnDef::new(Subscription::PublisherGuid).big_integer().not_null())
                    .col(
                        ColumnDef::new(Subscription::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_subscription")
                            .col(Subscription::SubscriberGuid)
                            .col(Subscription::PublisherGuid),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_subscriber")
                            .from(Subscription::Table, Subscription::SubscriberGuid)
                            .to(User::Table, User::Guid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_publisher")
                            .from(Subscription::Table, Subscription::PublisherGuid)
                            .to(User::Table, User::Guid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: publisher_guid (for listing subscribers)
        manager
            .create_index(
                Index::create()
                    .name("idx_subscription_publisher_guid")
                    .table(Subscription::Table)
                    .col(Subscription::PublisherGuid)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscription::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Subscription {
    Table,
    SubscriberGuid,
    PublisherGuid,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Guid,
}
