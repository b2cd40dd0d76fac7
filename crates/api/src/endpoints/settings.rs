//! Account settings endpoints.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use minds_common::{AppError, AppResult};
use serde::Deserialize;
use tracing::warn;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Channel deletion request.
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    pub password: String,
}

async fn delete_get() -> AppResult<ApiResponse<()>> {
    Err(AppError::BadRequest(
        "GET is not supported for this endpoint".to_string(),
    ))
}

/// Delete the current channel after re-checking the password.
async fn delete_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteRequest>,
) -> AppResult<ApiResponse<()>> {
    if !state.user_service.check_password(&user, &req.password)? {
        warn!(user = user.guid, "Channel deletion refused, wrong password");
        return Ok(ApiResponse::failed(StatusCode::UNAUTHORIZED));
    }

    state.channel_service.delete(&user).await?;
    Ok(ApiResponse::empty())
}

async fn noop() -> ApiResponse<()> {
    ApiResponse::empty()
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/delete",
        get(delete_get).post(delete_post).put(noop).delete(noop),
    )
}
