//! Single sign-on endpoints.

use axum::{Json, Router, extract::State, routing::post};
use minds_common::AppResult;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Connect request.
#[derive(Debug, Deserialize, Validate)]
pub struct ConnectRequest {
    #[validate(length(min = 1, max = 253))]
    pub domain: String,
}

/// Connect response. `token` is absent when the domain is not allowed.
#[derive(Serialize)]
pub struct ConnectResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

async fn connect(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ConnectRequest>,
) -> AppResult<ApiResponse<ConnectResponse>> {
    req.validate()?;
    let token = state.sso_service.generate_token(&user, &req.domain).await?;
    Ok(ApiResponse::ok(ConnectResponse { token }))
}

/// Authorize request.
#[derive(Debug, Deserialize, Validate)]
pub struct AuthorizeRequest {
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 1, max = 253))]
    pub domain: String,
}

/// Authorize response.
#[derive(Serialize)]
pub struct AuthorizeResponse {
    pub user_guid: String,
}

/// Redeem a token on the domain it was issued for.
async fn authorize(
    State(state): State<AppState>,
    Json(req): Json<AuthorizeRequest>,
) -> AppResult<ApiResponse<AuthorizeResponse>> {
    req.validate()?;
    let guid = state.sso_service.authorize(&req.token, &req.domain)?;
    Ok(ApiResponse::ok(AuthorizeResponse {
        user_guid: guid.to_string(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/connect", post(connect))
        .route("/authorize", post(authorize))
}
