//! Domain event dispatch.

use async_trait::async_trait;
use minds_common::AppResult;
use minds_db::entities::{entity, vote::VoteDirection};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::services::search::SearchIndexer;
use crate::services::votes::Vote;

/// Events raised by services after a successful mutation.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// A vote was cast, regardless of direction.
    VoteActionCast { vote: Vote },
    /// A vote was cast in a specific direction.
    Vote { direction: VoteDirection, vote: Vote },
    /// A vote was cancelled, regardless of direction.
    VoteActionCancel { vote: Vote },
    /// A vote was cancelled.
    VoteCancel { vote: Vote },
    /// An entity must be (re)indexed in search.
    SearchIndex {
        entity: entity::Model,
        immediate: bool,
    },
}

impl DomainEvent {
    /// Event name as seen by listeners.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::VoteActionCast { .. } => "vote:action:cast",
            Self::Vote { .. } => "vote",
            Self::VoteActionCancel { .. } => "vote:action:cancel",
            Self::VoteCancel { .. } => "vote:cancel",
            Self::SearchIndex { .. } => "search:index",
        }
    }
}

/// Trait for dispatching domain events.
#[async_trait]
pub trait EventDispatcher: Send + Sync {
    async fn trigger(&self, event: DomainEvent) -> AppResult<()>;
}

/// Shared dispatcher handle.
pub type EventDispatcherService = Arc<dyn EventDispatcher>;

/// Dispatcher that ignores every event.
#[derive(Clone, Default)]
pub struct NoOpEventDispatcher;

#[async_trait]
impl EventDispatcher for NoOpEventDispatcher {
    async fn trigger(&self, _event: DomainEvent) -> AppResult<()> {
        Ok(())
    }
}

/// In-process event bus. Routes `search:index` to the indexer.
#[derive(Clone, Default)]
pub struct EventBus {
    indexer: Option<SearchIndexer>,
}

impl EventBus {
    #[must_use]
    pub const fn new() -> Self {
        Self { indexer: None }
    }

    /// Set the search indexer.
    pub fn set_indexer(&mut self, indexer: SearchIndexer) {
        self.indexer = Some(indexer);
    }
}

#[async_trait]
impl EventDispatcher for EventBus {
    async fn trigger(&self, event: DomainEvent) -> AppResult<()> {
        match event {
            DomainEvent::SearchIndex { entity, immediate } => {
                let Some(indexer) = self.indexer.clone() else {
                    debug!(guid = entity.guid, "No indexer configured, skipping search:index");
                    return Ok(());
                };

                if immediate {
                    indexer.index_entity(&entity).await
                } else {
                    tokio::spawn(async move {
                        if let Err(e) = indexer.index_entity(&entity).await {
                            warn!(guid = entity.guid, error = %e, "Deferred indexing failed");
                        }
                    });
                    Ok(())
                }
            }
            other => {
                debug!(event = other.name(), "Event dispatched");
                Ok(())
            }
        }
    }
}
