//! Create user table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(User::Guid).big_integer().not_null().primary_key())
                    .col(ColumnDef::new(User::Username).string_len(128).not_null())
                    .col(ColumnDef::new(User::Name).string_len(256))
                    .col(ColumnDef::new(User::Email).string_len(320).not_null())
                    .col(ColumnDef::new(User::Password).string_len(256).not_null())
                    .col(ColumnDef::new(User::Token).string_len(64))
                    .col(ColumnDef::new(User::IsAdmin).boolean().not_null().default(false))
                    .col(ColumnDef::new(User::IsBanned).boolean().not_null().default(false))
                    .col(ColumnDef::new(User::IsDeleted).boolean().not_null().default(false))
                    .col(ColumnDef::new(User::EmailConfirmationToken).text())
                    .col(ColumnDef::new(User::EmailConfirmedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(User::Merchant).boolean().not_null().default(false))
                    .col(ColumnDef::new(User::ProDomain).string_len(256))
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(User::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_username")
                    .table(User::Table)
                    .col(User::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_token")
                    .table(User::Table)
                    .col(User::Token)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Pro domain lookups for SSO
        manager
            .create_index(
                Index::create()
                    .name("idx_user_pro_domain")
                    .table(User::Table)
                    .col(User::ProDomain)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum User {
    Table,
    Guid,
    Username,
    Name,
    Email,
    Password,
    Token,
    IsAdmin,
    IsBanned,
    IsDeleted,
    EmailConfirmationToken,
    EmailConfirmedAt,
    Merchant,
    ProDomain,
    CreatedAt,
    UpdatedAt,
}
