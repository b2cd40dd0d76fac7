//! Vote endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use minds_common::AppResult;
use minds_core::{VoteOptions, parse_direction};
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Vote state response.
#[derive(Serialize)]
pub struct VoteStateResponse {
    pub voted: bool,
}

/// Cast the vote if absent, cancel it otherwise.
async fn toggle(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((guid, direction)): Path<(i64, String)>,
) -> AppResult<ApiResponse<()>> {
    let direction = parse_direction(&direction)?;
    let vote = state.vote_service.vote_for(guid, user, direction).await?;
    state.vote_service.toggle(&vote, VoteOptions::default()).await?;
    Ok(ApiResponse::empty())
}

/// Whether the current user has voted in this direction.
async fn show(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((guid, direction)): Path<(i64, String)>,
) -> AppResult<ApiResponse<VoteStateResponse>> {
    let direction = parse_direction(&direction)?;
    let vote = state.vote_service.vote_for(guid, user, direction).await?;
    let voted = state.vote_service.has(&vote).await?;
    Ok(ApiResponse::ok(VoteStateResponse { voted }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{guid}/{direction}", get(show).put(toggle))
}
