//! Email confirmation endpoints.

use axum::{Json, Router, extract::State, routing::post};
use minds_common::AppResult;
use serde::Deserialize;
use tracing::info;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Confirm request.
#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub token: String,
}

/// Issue a new confirmation token and queue the email.
async fn resend(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    let user = state.email_confirmation_service.send_email(&user).await?;
    info!(user = user.guid, "Confirmation email re-sent");
    Ok(ApiResponse::empty())
}

async fn confirm(
    State(state): State<AppState>,
    Json(req): Json<ConfirmRequest>,
) -> AppResult<ApiResponse<()>> {
    state.email_confirmation_service.confirm(&req.token).await?;
    Ok(ApiResponse::empty())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/confirmation/resend", post(resend))
        .route("/confirm", post(confirm))
}
