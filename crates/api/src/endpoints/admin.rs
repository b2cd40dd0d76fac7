//! Admin endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use minds_common::AppResult;
use serde::Deserialize;
use tracing::info;

use crate::{extractors::AdminUser, middleware::AppState, response::ApiResponse};

/// NSFW flag request.
#[derive(Debug, Default, Deserialize)]
pub struct NsfwRequest {
    #[serde(default)]
    pub nsfw: Vec<i32>,
}

async fn noop() -> ApiResponse<()> {
    ApiResponse::empty()
}

/// Set and lock the NSFW reasons of an entity.
async fn mark_nsfw(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(guid): Path<String>,
    Json(req): Json<NsfwRequest>,
) -> AppResult<ApiResponse<()>> {
    // Anything that is not a guid is treated as a missing one
    let guid = guid.parse::<i64>().unwrap_or(0);

    state.nsfw_service.mark(guid, &req.nsfw).await?;
    info!(admin = admin.guid, guid, "NSFW reasons set by admin");
    Ok(ApiResponse::empty())
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/nsfw/{guid}",
        get(noop).post(mark_nsfw).put(noop).delete(noop),
    )
}
