//! YouTube importer worker.

use apalis::prelude::*;
use minds_common::AppResult;
use minds_core::{AclContext, YouTubeImportService};
use tracing::{error, info};

use crate::jobs::YouTubeImportJob;

/// Jobs the importer runs at once.
pub const YOUTUBE_IMPORT_CONCURRENCY: usize = 1;

/// Context for the YouTube importer worker.
#[derive(Clone)]
pub struct YouTubeImportContext {
    pub service: YouTubeImportService,
}

impl YouTubeImportContext {
    #[must_use]
    pub const fn new(service: YouTubeImportService) -> Self {
        Self { service }
    }
}

/// Worker function for YouTube imports.
pub async fn youtube_import_worker(
    job: YouTubeImportJob,
    ctx: Data<YouTubeImportContext>,
) -> Result<(), Error> {
    match import_video(&job, &ctx).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!(video = %job.video_guid, error = %e, "YouTube import failed");
            let err: Box<dyn std::error::Error + Send + Sync> = Box::new(e);
            Err(Error::Failed(err.into()))
        }
    }
}

/// Start importing the video a job points to.
///
/// The job owner is not necessarily the session user of anyone, so the
/// write check runs with a bypass context scoped to this one call.
pub async fn import_video(job: &YouTubeImportJob, ctx: &YouTubeImportContext) -> AppResult<()> {
    let import = job.import()?;
    let owner = ctx.service.owner(&import).await?;

    info!(
        video = import.video_guid,
        owner = owner.guid,
        username = %owner.username,
        "Importing YouTube video"
    );

    ctx.service.on_queue(&import, &AclContext::bypass()).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use minds_common::AppError;
    use minds_core::Acl;
    use minds_db::entities::{entity, entity::EntityType, user};
    use minds_db::repositories::{EntityRepository, UserRepository};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use serde_json::json;
    use std::sync::Arc;

    /// Denies every write unless the context bypasses checks.
    struct OwnerOnlyAcl;

    #[async_trait]
    impl Acl for OwnerOnlyAcl {
        async fn interact(
            &self,
            _entity: &entity::Model,
            _actor: &user::Model,
            _action: &str,
        ) -> AppResult<bool> {
            Ok(true)
        }

        async fn write(
            &self,
            _entity: &entity::Model,
            _actor: &user::Model,
            ctx: &AclContext,
        ) -> AppResult<bool> {
            Ok(ctx.is_bypassed())
        }
    }

    fn owner() -> user::Model {
        user::Model {
            guid: 2,
            username: "owner".to_string(),
            name: None,
            email: "owner@example.com".to_string(),
            password: String::new(),
            token: None,
            is_admin: false,
            is_banned: false,
            is_deleted: false,
            email_confirmation_token: None,
            email_confirmed_at: Some(Utc::now().into()),
            merchant: false,
            pro_domain: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn video(status: &str) -> entity::Model {
        entity::Model {
            guid: 20,
            entity_type: EntityType::Object,
            subtype: Some("video".to_string()),
            owner_guid: 2,
            access_id: "2".to_string(),
            entity_guid: None,
            nsfw: json!([]),
            nsfw_lock: json!([]),
            votes_up: 0,
            votes_down: 0,
            message: None,
            title: Some("Imported".to_string()),
            custom_type: None,
            license: None,
            rating: 1,
            pending: false,
            transcoding_status: Some(status.to_string()),
            youtube_id: Some("dQw4w9WgXcQ".to_string()),
            time_created: Utc::now().into(),
            time_updated: None,
        }
    }

    fn context(db: DatabaseConnection) -> YouTubeImportContext {
        let db = Arc::new(db);
        YouTubeImportContext::new(YouTubeImportService::new(
            EntityRepository::new(db.clone()),
            UserRepository::new(db),
            Arc::new(OwnerOnlyAcl),
        ))
    }

    #[tokio::test]
    async fn test_import_runs_with_bypass_context() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![owner()]])
            .append_query_results([vec![video("queued")]])
            .append_query_results([vec![owner()]])
            .append_query_results([vec![video("transcoding")]])
            .into_connection();

        import_video(&YouTubeImportJob::new(20, 2), &context(db))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_owner_fails_the_job() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let result = import_video(&YouTubeImportJob::new(20, 2), &context(db)).await;
        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }
}
