//! Sitemap documents.

use axum::{
    Router,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
};
use minds_common::AppResult;
use minds_core::{MAX_URLS, ResolverKind};
use serde::Deserialize;

use crate::middleware::AppState;

/// Sitemap query.
#[derive(Debug, Default, Deserialize)]
pub struct SitemapQuery {
    pub limit: Option<usize>,
}

async fn sitemap(
    State(state): State<AppState>,
    Path(resolver): Path<String>,
    Query(query): Query<SitemapQuery>,
) -> AppResult<impl IntoResponse> {
    let kind: ResolverKind = resolver.parse()?;
    let xml = state
        .sitemaps_service
        .render(kind, query.limit.unwrap_or(MAX_URLS))
        .await?;
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{resolver}", get(sitemap))
}
