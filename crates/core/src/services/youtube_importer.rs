//! YouTube video imports.
//!
//! Import requests arrive on the `YouTubeImporter` queue and are handled one
//! at a time by the queue runner, which passes an elevated [`AclContext`] for
//! the single call.

use chrono::Utc;
use minds_common::{AppError, AppResult};
use minds_db::{
    entities::{entity, user},
    repositories::{EntityRepository, UserRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::services::acl::{AclContext, AclHandle};

pub const STATUS_TRANSCODING: &str = "transcoding";

/// A queued import request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoImport {
    pub video_guid: i64,
    pub owner_guid: i64,
}

/// YouTube import service.
#[derive(Clone)]
pub struct YouTubeImportService {
    entity_repo: EntityRepository,
    user_repo: UserRepository,
    acl: AclHandle,
}

impl YouTubeImportService {
    #[must_use]
    pub const fn new(entity_repo: EntityRepository, user_repo: UserRepository, acl: AclHandle) -> Self {
        Self {
            entity_repo,
            user_repo,
            acl,
        }
    }

    /// Owner of the video being imported.
    pub async fn owner(&self, import: &VideoImport) -> AppResult<user::Model> {
        self.user_repo.get_by_guid(import.owner_guid).await
    }

    /// Handle a dequeued request: start transcoding the video.
    pub async fn on_queue(&self, import: &VideoImport, ctx: &AclContext) -> AppResult<entity::Model> {
        let video = self.entity_repo.get_by_guid(import.video_guid).await?;
        let owner = self.owner(import).await?;

        if !self.acl.write(&video, &owner, ctx).await? {
            return Err(AppError::Forbidden(format!(
                "Cannot import video {}",
                import.video_guid
            )));
        }

        let mut active: entity::ActiveModel = video.into();
        active.transcoding_status = Set(Some(STATUS_TRANSCODING.to_string()));
        active.time_updated = Set(Some(Utc::now().into()));
        let saved = self.entity_repo.update(active).await?;

        info!(video = saved.guid, owner = owner.guid, "YouTube import started");
        Ok(saved)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_fixtures::{StaticAcl, entity, user};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    const STATUS_QUEUED: &str = "queued";

    fn service(db: DatabaseConnection, acl: &StaticAcl) -> YouTubeImportService {
        let db = Arc::new(db);
        YouTubeImportService::new(
            EntityRepository::new(db.clone()),
            UserRepository::new(db),
            Arc::new(acl.clone()),
        )
    }

    fn video(status: Option<&str>) -> entity::Model {
        let mut v = entity(20, 2, "2");
        v.youtube_id = Some("dQw4w9WgXcQ".to_string());
        v.transcoding_status = status.map(String::from);
        v
    }

    #[tokio::test]
    async fn test_on_queue_passes_context_to_acl() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[video(Some(STATUS_QUEUED))]])
            .append_query_results([[user(2)]])
            .append_query_results([[video(Some(STATUS_TRANSCODING))]])
            .into_connection();
        let acl = StaticAcl::allow();

        let saved = service(db, &acl)
            .on_queue(&VideoImport { video_guid: 20, owner_guid: 2 }, &AclContext::bypass())
            .await
            .unwrap();

        assert_eq!(saved.transcoding_status.as_deref(), Some(STATUS_TRANSCODING));
        assert_eq!(acl.actions(), vec!["write:bypass=true".to_string()]);
    }

    #[tokio::test]
    async fn test_on_queue_denied() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[video(Some(STATUS_QUEUED))]])
            .append_query_results([[user(2)]])
            .into_connection();

        let result = service(db, &StaticAcl::deny())
            .on_queue(&VideoImport { video_guid: 20, owner_guid: 2 }, &AclContext::standard())
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
