//! Vote index repository.

use std::sync::Arc;

use crate::entities::{Vote, vote};
use chrono::Utc;
use minds_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, sea_query::OnConflict,
};

/// Existence index of votes, one row per (actor, entity, direction).
#[derive(Clone)]
pub struct VoteRepository {
    db: Arc<DatabaseConnection>,
}

impl VoteRepository {
    /// Create a new vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check whether the actor has voted on the entity in this direction.
    pub async fn exists(
        &self,
        actor_guid: i64,
        entity_guid: i64,
        direction: vote::VoteDirection,
    ) -> AppResult<bool> {
        let row = Vote::find()
            .filter(vote::Column::ActorGuid.eq(actor_guid))
            .filter(vote::Column::EntityGuid.eq(entity_guid))
            .filter(vote::Column::Direction.eq(direction))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.is_some())
    }

    /// Record a vote. Inserting an existing vote is a no-op.
    pub async fn insert(
        &self,
        actor_guid: i64,
        entity_guid: i64,
        direction: vote::VoteDirection,
    ) -> AppResult<()> {
        let model = vote::ActiveModel {
            actor_guid: Set(actor_guid),
            entity_guid: Set(entity_guid),
            direction: Set(direction),
            created_at: Set(Utc::now().into()),
        };

        Vote::insert(model)
            .on_conflict(
                OnConflict::columns([
                    vote::Column::ActorGuid,
                    vote::Column::EntityGuid,
                    vote::Column::Direction,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Remove a vote. Removing a missing vote is a no-op.
    pub async fn remove(
        &self,
        actor_guid: i64,
        entity_guid: i64,
        direction: vote::VoteDirection,
    ) -> AppResult<()> {
        Vote::delete_many()
            .filter(vote::Column::ActorGuid.eq(actor_guid))
            .filter(vote::Column::EntityGuid.eq(entity_guid))
            .filter(vote::Column::Direction.eq(direction))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
