//! Analytics endpoints: dashboards and cached graphs.

use std::collections::BTreeMap;

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::Utc;
use minds_common::{AppError, AppResult};
use minds_core::{
    AggregateKind, AggregateValue, DEFAULT_SPAN, DashboardKind, GraphOptions, OnchainKey,
    TimeUnit, Timespan,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Dashboard query.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub timespan: Option<String>,
}

/// Dashboard response.
#[derive(Serialize)]
pub struct DashboardResponse {
    pub dashboard: Value,
}

async fn dashboard(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<ApiResponse<DashboardResponse>> {
    let kind: DashboardKind = id.parse()?;
    let timespan = query
        .timespan
        .as_deref()
        .map(str::parse::<Timespan>)
        .transpose()?
        .unwrap_or_default();

    let dashboard = state.dashboards_service.get(kind, timespan, Utc::now()).await?;
    Ok(ApiResponse::ok(DashboardResponse { dashboard }))
}

/// Graph query.
#[derive(Debug, Default, Deserialize)]
pub struct GraphQuery {
    pub key: Option<String>,
    pub unit: Option<String>,
    pub span: Option<u32>,
    #[serde(default)]
    pub ignore_cache: bool,
}

impl GraphQuery {
    fn options(&self) -> AppResult<GraphOptions> {
        let unit = match self.unit.as_deref() {
            Some(raw) => raw
                .parse::<TimeUnit>()
                .map_err(|_| AppError::BadRequest(format!("{raw} is not an accepted unit")))?,
            None => TimeUnit::Day,
        };

        Ok(GraphOptions {
            key: OnchainKey::parse(self.key.as_deref()),
            unit,
            span: self.span.unwrap_or(DEFAULT_SPAN),
            ignore_cache: self.ignore_cache,
        })
    }
}

/// Graph response.
#[derive(Serialize)]
pub struct GraphResponse<T: Serialize> {
    pub data: T,
}

async fn graph(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(aggregate): Path<String>,
    Query(query): Query<GraphQuery>,
) -> AppResult<ApiResponse<GraphResponse<AggregateValue>>> {
    let aggregate: AggregateKind = aggregate.parse()?;
    let data = state
        .graphs_service
        .get(aggregate, query.options()?, Utc::now())
        .await?;
    Ok(ApiResponse::ok(GraphResponse { data }))
}

/// Recompute and re-cache every graph of an aggregate.
async fn sync(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(aggregate): Path<String>,
) -> AppResult<ApiResponse<GraphResponse<BTreeMap<String, AggregateValue>>>> {
    let aggregate: AggregateKind = aggregate.parse()?;
    let data = state.graphs_service.sync(aggregate, Utc::now()).await?;
    tracing::info!(admin = admin.guid, aggregate = aggregate.as_str(), graphs = data.len(), "Graphs synced");
    Ok(ApiResponse::ok(GraphResponse { data }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboards/{id}", get(dashboard))
        .route("/graphs/{aggregate}", get(graph))
        .route("/graphs/{aggregate}/sync", post(sync))
}
