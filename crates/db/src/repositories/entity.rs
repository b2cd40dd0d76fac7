//! Content entity repository.

use std::sync::Arc;

use crate::entities::{ContentEntity, entity, vote::VoteDirection};
use minds_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, sea_query::Expr,
};

/// Entity repository for database operations.
#[derive(Clone)]
pub struct EntityRepository {
    db: Arc<DatabaseConnection>,
}

impl EntityRepository {
    /// Create a new entity repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an entity by guid.
    pub async fn find_by_guid(&self, guid: i64) -> AppResult<Option<entity::Model>> {
        ContentEntity::find_by_id(guid)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an entity by guid, returning an error if not found.
    pub async fn get_by_guid(&self, guid: i64) -> AppResult<entity::Model> {
        self.find_by_guid(guid)
            .await?
            .ok_or_else(|| AppError::EntityNotFound(guid.to_string()))
    }

    /// Find entities by guids. Missing guids are skipped.
    pub async fn find_by_guids(&self, guids: &[i64]) -> AppResult<Vec<entity::Model>> {
        if guids.is_empty() {
            return Ok(vec![]);
        }

        ContentEntity::find()
            .filter(entity::Column::Guid.is_in(guids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Most recent entities of a channel.
    pub async fn find_by_owner(&self, owner_guid: i64, limit: u64) -> AppResult<Vec<entity::Model>> {
        ContentEntity::find()
            .filter(entity::Column::OwnerGuid.eq(owner_guid))
            .order_by_desc(entity::Column::TimeCreated)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new entity.
    pub async fn create(&self, model: entity::ActiveModel) -> AppResult<entity::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an entity.
    pub async fn update(&self, model: entity::ActiveModel) -> AppResult<entity::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Apply a delta to a vote counter atomically. Counters never drop below zero.
    pub async fn update_vote_count(
        &self,
        guid: i64,
        direction: VoteDirection,
        delta: i64,
    ) -> AppResult<()> {
        let (column, name) = match direction {
            VoteDirection::Up => (entity::Column::VotesUp, "votes_up"),
            VoteDirection::Down => (entity::Column::VotesDown, "votes_down"),
        };

        let expr = if delta >= 0 {
            Expr::col(column).add(delta)
        } else {
            Expr::cust(format!("GREATEST({name} - {}, 0)", delta.unsigned_abs()))
        };

        ContentEntity::update_many()
            .col_expr(column, expr)
            .filter(entity::Column::Guid.eq(guid))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
