//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20240601_000001_create_user_table;
mod m20240601_000002_create_entity_table;
mod m20240601_000003_create_vote_table;
mod m20240601_000004_create_subscription_table;
mod m20240601_000005_create_group_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_user_table::Migration),
            Box::new(m20240601_000002_create_entity_table::Migration),
            Box::new(m20240601_000003_create_vote_table::Migration),
            Box::new(m20240601_000004_create_subscription_table::Migration),
            Box::new(m20240601_000005_create_group_tables::Migration),
        ]
    }
}
