//! API endpoints.

mod admin;
mod analytics;
mod email;
mod feeds;
mod permissions;
mod settings;
mod sitemaps;
mod sso;
mod votes;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router, mounted under `/api`.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/v1/votes", votes::router())
        .nest("/v2/permissions", permissions::router())
        .nest("/v2/email", email::router())
        .nest("/v2/analytics", analytics::router())
        .nest("/v2/admin", admin::router())
        .nest("/v2/settings", settings::router())
        .nest("/v2/feeds", feeds::router())
        .nest("/v2/sso", sso::router())
}

/// Create the sitemap router, mounted under `/sitemaps`.
pub fn sitemaps_router() -> Router<AppState> {
    sitemaps::router()
}
