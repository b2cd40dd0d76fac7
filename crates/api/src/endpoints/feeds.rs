//! Feed endpoints.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use chrono::Utc;
use minds_common::AppResult;
use minds_core::{Period, ScoredGuid, TopFeedOptions};
use minds_db::entities::entity::EntityType;
use serde::{Deserialize, Serialize};

use crate::{middleware::AppState, response::ApiResponse};

/// Top feed query.
#[derive(Debug, Default, Deserialize)]
pub struct TopFeedQuery {
    #[serde(rename = "type")]
    pub entity_type: Option<EntityType>,
    pub period: Option<String>,
    pub limit: Option<u32>,
    #[serde(default)]
    pub nsfw: bool,
}

impl TopFeedQuery {
    fn options(&self) -> AppResult<TopFeedOptions> {
        let defaults = TopFeedOptions::default();
        Ok(TopFeedOptions {
            entity_type: self.entity_type.unwrap_or(defaults.entity_type),
            period: self
                .period
                .as_deref()
                .map(str::parse::<Period>)
                .transpose()?
                .unwrap_or(defaults.period),
            limit: self.limit.unwrap_or(defaults.limit).clamp(1, 150),
            include_nsfw: self.nsfw,
        })
    }
}

/// Top feed response.
#[derive(Serialize)]
pub struct TopFeedResponse {
    pub entities: Vec<ScoredGuid>,
}

async fn top(
    State(state): State<AppState>,
    Query(query): Query<TopFeedQuery>,
) -> AppResult<ApiResponse<TopFeedResponse>> {
    let entities = state
        .top_feed_service
        .get_list(&query.options()?, Utc::now())
        .await?;
    Ok(ApiResponse::ok(TopFeedResponse { entities }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/top", get(top))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_clamped() {
        let query = TopFeedQuery {
            limit: Some(10_000),
            ..TopFeedQuery::default()
        };
        assert_eq!(query.options().unwrap().limit, 150);
    }

    #[test]
    fn test_unknown_period_is_rejected() {
        let query = TopFeedQuery {
            period: Some("2w".to_string()),
            ..TopFeedQuery::default()
        };
        assert!(query.options().is_err());
    }
}
