//! Permission export endpoints.

use axum::{Json, Router, extract::State, routing::post};
use minds_common::{AppError, AppResult};
use serde::Deserialize;
use serde_json::Value;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// A guid sent either as a JSON number or as a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GuidParam {
    Number(i64),
    Text(String),
}

impl GuidParam {
    fn parse(&self) -> AppResult<i64> {
        match self {
            Self::Number(guid) => Ok(*guid),
            Self::Text(raw) => raw
                .parse()
                .map_err(|_| AppError::BadRequest(format!("Invalid guid: {raw}"))),
        }
    }
}

/// Entities permission request.
#[derive(Debug, Deserialize)]
pub struct EntitiesRequest {
    #[serde(default)]
    pub guids: Vec<GuidParam>,
}

/// Roles of the current user over the requested entities.
async fn entities(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<EntitiesRequest>,
) -> AppResult<ApiResponse<Value>> {
    let guids = req
        .guids
        .iter()
        .map(GuidParam::parse)
        .collect::<AppResult<Vec<_>>>()?;

    let export = state.permissions_service.entities(user, &guids).await?;
    Ok(ApiResponse::ok(export))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/entities", post(entities))
}
