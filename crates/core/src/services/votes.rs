//! Vote casting and cancellation.

use minds_common::{AppError, AppResult};
use minds_db::{
    entities::{entity, user, vote::VoteDirection},
    repositories::{EntityRepository, VoteRepository},
};
use tracing::info;

use crate::services::acl::AclHandle;
use crate::services::events::{DomainEvent, EventDispatcherService};

/// Wire name of a vote direction.
#[must_use]
pub const fn direction_name(direction: VoteDirection) -> &'static str {
    match direction {
        VoteDirection::Up => "up",
        VoteDirection::Down => "down",
    }
}

/// Parse a vote direction from its wire name.
pub fn parse_direction(raw: &str) -> AppResult<VoteDirection> {
    match raw {
        "up" => Ok(VoteDirection::Up),
        "down" => Ok(VoteDirection::Down),
        other => Err(AppError::BadRequest(format!("Invalid vote direction: {other}"))),
    }
}

/// A vote by an actor on an entity.
#[derive(Debug, Clone)]
pub struct Vote {
    entity: entity::Model,
    actor: user::Model,
    direction: VoteDirection,
}

impl Vote {
    #[must_use]
    pub const fn new(entity: entity::Model, actor: user::Model, direction: VoteDirection) -> Self {
        Self {
            entity,
            actor,
            direction,
        }
    }

    #[must_use]
    pub const fn entity(&self) -> &entity::Model {
        &self.entity
    }

    #[must_use]
    pub const fn actor(&self) -> &user::Model {
        &self.actor
    }

    #[must_use]
    pub const fn direction(&self) -> VoteDirection {
        self.direction
    }
}

/// Per-call options.
#[derive(Debug, Clone, Copy)]
pub struct VoteOptions {
    /// Emit vote events after the mutation.
    pub events: bool,
}

impl Default for VoteOptions {
    fn default() -> Self {
        Self { events: true }
    }
}

/// Vote service for business logic.
#[derive(Clone)]
pub struct VoteService {
    entity_repo: EntityRepository,
    vote_repo: VoteRepository,
    acl: AclHandle,
    dispatcher: Option<EventDispatcherService>,
}

impl VoteService {
    /// Create a new vote service.
    #[must_use]
    pub fn new(entity_repo: EntityRepository, vote_repo: VoteRepository, acl: AclHandle) -> Self {
        Self {
            entity_repo,
            vote_repo,
            acl,
            dispatcher: None,
        }
    }

    /// Set the event dispatcher.
    pub fn set_dispatcher(&mut self, dispatcher: EventDispatcherService) {
        self.dispatcher = Some(dispatcher);
    }

    /// Build a vote by `actor` on the entity with `guid`.
    pub async fn vote_for(
        &self,
        guid: i64,
        actor: user::Model,
        direction: VoteDirection,
    ) -> AppResult<Vote> {
        let entity = self.entity_repo.get_by_guid(guid).await?;
        Ok(Vote::new(entity, actor, direction))
    }

    /// Cast a vote. Nothing is written unless the actor may interact with the entity.
    pub async fn cast(&self, vote: &Vote, opts: VoteOptions) -> AppResult<bool> {
        let action = format!("vote{}", direction_name(vote.direction()));

        if !self.acl.interact(vote.entity(), vote.actor(), &action).await? {
            return Err(AppError::Forbidden(
                "Actor cannot interact with entity".to_string(),
            ));
        }

        self.entity_repo
            .update_vote_count(vote.entity().guid, vote.direction(), 1)
            .await?;
        self.vote_repo
            .insert(vote.actor().guid, vote.entity().guid, vote.direction())
            .await?;

        info!(
            actor = vote.actor().guid,
            entity = vote.entity().guid,
            direction = direction_name(vote.direction()),
            "Vote cast"
        );

        if opts.events {
            if let Some(ref dispatcher) = self.dispatcher {
                dispatcher
                    .trigger(DomainEvent::VoteActionCast { vote: vote.clone() })
                    .await?;
                dispatcher
                    .trigger(DomainEvent::Vote {
                        direction: vote.direction(),
                        vote: vote.clone(),
                    })
                    .await?;
            }
        }

        Ok(true)
    }

    /// Cancel a vote. Interaction permissions are not re-checked.
    pub async fn cancel(&self, vote: &Vote, opts: VoteOptions) -> AppResult<bool> {
        self.entity_repo
            .update_vote_count(vote.entity().guid, vote.direction(), -1)
            .await?;
        self.vote_repo
            .remove(vote.actor().guid, vote.entity().guid, vote.direction())
            .await?;

        info!(
            actor = vote.actor().guid,
            entity = vote.entity().guid,
            direction = direction_name(vote.direction()),
            "Vote cancelled"
        );

        if opts.events {
            if let Some(ref dispatcher) = self.dispatcher {
                dispatcher
                    .trigger(DomainEvent::VoteActionCancel { vote: vote.clone() })
                    .await?;
                dispatcher
                    .trigger(DomainEvent::VoteCancel { vote: vote.clone() })
                    .await?;
            }
        }

        Ok(true)
    }

    /// Cast the vote if absent, cancel it if present.
    pub async fn toggle(&self, vote: &Vote, opts: VoteOptions) -> AppResult<bool> {
        if self.has(vote).await? {
            self.cancel(vote, opts).await
        } else {
            self.cast(vote, opts).await
        }
    }

    /// Whether the vote exists in the index.
    pub async fn has(&self, vote: &Vote) -> AppResult<bool> {
        self.vote_repo
            .exists(vote.actor().guid, vote.entity().guid, vote.direction())
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_fixtures::{
        RecordingDispatcher, StaticAcl, confirmed_user, entity, exec_ok,
    };
    use chrono::Utc;
    use minds_db::entities::vote;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn vote_row() -> vote::Model {
        vote::Model {
            actor_guid: 1,
            entity_guid: 10,
            direction: VoteDirection::Up,
            created_at: Utc::now().into(),
        }
    }

    fn up_vote() -> Vote {
        Vote::new(entity(10, 2, "2"), confirmed_user(1), VoteDirection::Up)
    }

    fn service(db: MockDatabase, acl: StaticAcl) -> VoteService {
        let conn = Arc::new(db.into_connection());
        VoteService::new(
            EntityRepository::new(Arc::clone(&conn)),
            VoteRepository::new(conn),
            Arc::new(acl),
        )
    }

    #[tokio::test]
    async fn test_cast() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok(), exec_ok()]);
        let acl = StaticAcl::allow();
        let svc = service(db, acl.clone());

        assert!(svc.cast(&up_vote(), VoteOptions { events: false }).await.unwrap());
        assert_eq!(acl.actions(), vec!["voteup".to_string()]);
    }

    #[tokio::test]
    async fn test_cast_sends_events() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok(), exec_ok()]);
        let mut svc = service(db, StaticAcl::allow());
        let dispatcher = RecordingDispatcher::default();
        svc.set_dispatcher(Arc::new(dispatcher.clone()));

        svc.cast(&up_vote(), VoteOptions { events: true }).await.unwrap();

        assert_eq!(dispatcher.names(), vec!["vote:action:cast", "vote"]);
    }

    #[tokio::test]
    async fn test_cast_without_events_is_silent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok(), exec_ok()]);
        let mut svc = service(db, StaticAcl::allow());
        let dispatcher = RecordingDispatcher::default();
        svc.set_dispatcher(Arc::new(dispatcher.clone()));

        svc.cast(&up_vote(), VoteOptions { events: false }).await.unwrap();

        assert!(dispatcher.names().is_empty());
    }

    #[tokio::test]
    async fn test_cast_propagates_unverified_email() {
        // No exec results: any write would surface as a database error.
        let db = MockDatabase::new(DatabaseBackend::Postgres);
        let svc = service(db, StaticAcl::unverified());

        let result = svc.cast(&up_vote(), VoteOptions::default()).await;

        assert!(matches!(result, Err(AppError::UnverifiedEmail)));
    }

    #[tokio::test]
    async fn test_cast_denied_leaves_counters_untouched() {
        let db = MockDatabase::new(DatabaseBackend::Postgres);
        let svc = service(db, StaticAcl::deny());

        let err = svc
            .cast(&up_vote(), VoteOptions { events: false })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(err.to_string(), "Actor cannot interact with entity");
    }

    #[tokio::test]
    async fn test_failed_second_cast_keeps_existing_vote() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![vote_row()], vec![vote_row()]]);
        let svc = service(db, StaticAcl::deny());
        let vote = up_vote();

        assert!(svc.has(&vote).await.unwrap());
        assert!(svc.cast(&vote, VoteOptions::default()).await.is_err());
        assert!(svc.has(&vote).await.unwrap());
    }

    #[tokio::test]
    async fn test_cancel_sends_events() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok(), exec_ok()]);
        let acl = StaticAcl::deny();
        let mut svc = service(db, acl.clone());
        let dispatcher = RecordingDispatcher::default();
        svc.set_dispatcher(Arc::new(dispatcher.clone()));

        assert!(svc.cancel(&up_vote(), VoteOptions { events: true }).await.unwrap());
        assert_eq!(dispatcher.names(), vec!["vote:action:cancel", "vote:cancel"]);
        assert!(acl.actions().is_empty());
    }

    #[tokio::test]
    async fn test_has() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<vote::Model>::new()]);
        let svc = service(db, StaticAcl::allow());

        assert!(!svc.has(&up_vote()).await.unwrap());
    }

    #[tokio::test]
    async fn test_toggle_on() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<vote::Model>::new()])
            .append_exec_results([exec_ok(), exec_ok()]);
        let acl = StaticAcl::allow();
        let svc = service(db, acl.clone());

        assert!(svc.toggle(&up_vote(), VoteOptions { events: false }).await.unwrap());
        assert_eq!(acl.actions(), vec!["voteup".to_string()]);
    }

    #[tokio::test]
    async fn test_toggle_off() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![vote_row()]])
            .append_exec_results([exec_ok(), exec_ok()]);
        let acl = StaticAcl::allow();
        let svc = service(db, acl.clone());

        assert!(svc.toggle(&up_vote(), VoteOptions { events: false }).await.unwrap());
        assert!(acl.actions().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_twice_round_trips() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                Vec::<vote::Model>::new(),
                Vec::<vote::Model>::new(),
                vec![vote_row()],
                Vec::<vote::Model>::new(),
            ])
            .append_exec_results([exec_ok(), exec_ok(), exec_ok(), exec_ok()]);
        let svc = service(db, StaticAcl::allow());
        let vote = up_vote();
        let opts = VoteOptions { events: false };

        assert!(!svc.has(&vote).await.unwrap());
        svc.toggle(&vote, opts).await.unwrap();
        svc.toggle(&vote, opts).await.unwrap();
        assert!(!svc.has(&vote).await.unwrap());
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!(parse_direction("up").unwrap(), VoteDirection::Up);
        assert!(parse_direction("sideways").is_err());
    }
}
