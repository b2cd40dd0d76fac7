//! User repository.

use std::sync::Arc;

use crate::entities::{User, user};
use minds_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, sea_query::Expr,
};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by guid.
    pub async fn find_by_guid(&self, guid: i64) -> AppResult<Option<user::Model>> {
        User::find_by_id(guid)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by guid, returning an error if not found.
    pub async fn get_by_guid(&self, guid: i64) -> AppResult<user::Model> {
        self.find_by_guid(guid)
            .await?
            .ok_or_else(|| AppError::UserNotFound(guid.to_string()))
    }

    /// Find users by guids.
    pub async fn find_by_guids(&self, guids: &[i64]) -> AppResult<Vec<user::Model>> {
        if guids.is_empty() {
            return Ok(vec![]);
        }

        User::find()
            .filter(user::Column::Guid.is_in(guids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by access token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Token.eq(token))
            .filter(user::Column::IsDeleted.eq(false))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the Pro channel owning a custom domain.
    pub async fn find_by_pro_domain(&self, domain: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::ProDomain.eq(domain.to_lowercase()))
            .filter(user::Column::IsDeleted.eq(false))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a user.
    pub async fn update(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Soft-delete a user and revoke their access token (single UPDATE query).
    pub async fn mark_deleted(&self, guid: i64) -> AppResult<()> {
        User::update_many()
            .col_expr(user::Column::IsDeleted, Expr::value(true))
            .col_expr(user::Column::Token, Expr::value(Option::<String>::None))
            .col_expr(user::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(user::Column::Guid.eq(guid))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_user(guid: i64, username: &str) -> user::Model {
        user::Model {
            guid,
            username: username.to_string(),
            name: None,
            email: format!("{username}@example.com"),
            password: "hash".to_string(),
            token: Some("test_token".to_string()),
            is_admin: false,
            is_banned: false,
            is_deleted: false,
            email_confirmation_token: None,
            email_confirmed_at: None,
            merchant: false,
            pro_domain: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_guid_found() {
        let user = create_test_user(1001, "alice");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_guid(1001).await.unwrap();

        assert_eq!(result.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_get_by_guid_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.get_by_guid(404).await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_guids_empty_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = UserRepository::new(db);
        let result = repo.find_by_guids(&[]).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_token() {
        let user = create_test_user(1001, "alice");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_token("test_token").await.unwrap();

        assert_eq!(result.unwrap().guid, 1001);
    }

    #[tokio::test]
    async fn test_mark_deleted() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        assert!(repo.mark_deleted(1001).await.is_ok());
    }
}
