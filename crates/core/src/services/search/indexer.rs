//! Search indexing of entities and channels.

use minds_common::AppResult;
use minds_db::entities::{entity, user};
use serde_json::Value;
use tracing::info;

use super::client::SearchClientService;
use super::mappings::{Mapping, export_entity, export_user};

/// Maps entities with their mapping and writes them to the index.
#[derive(Clone)]
pub struct SearchIndexer {
    client: SearchClientService,
    index: String,
}

impl SearchIndexer {
    #[must_use]
    pub fn new(client: SearchClientService, index: impl Into<String>) -> Self {
        Self {
            client,
            index: index.into(),
        }
    }

    /// Index (or re-index) an entity.
    pub async fn index_entity(&self, entity: &entity::Model) -> AppResult<()> {
        let doc = Mapping::for_type(entity.entity_type).map(&export_entity(entity));
        self.client
            .index_document(&self.index, &entity.guid.to_string(), Value::Object(doc))
            .await?;

        info!(guid = entity.guid, entity_type = entity.entity_type.as_str(), "Indexed entity");
        Ok(())
    }

    /// Index (or re-index) a channel.
    pub async fn index_user(&self, user: &user::Model) -> AppResult<()> {
        let doc = Mapping::user().map(&export_user(user));
        self.client
            .index_document(&self.index, &user.guid.to_string(), Value::Object(doc))
            .await?;

        info!(guid = user.guid, "Indexed user");
        Ok(())
    }
}
