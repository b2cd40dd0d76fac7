//! HTTP API layer for minds-rs.
//!
//! - **Endpoints**: votes, permissions, email confirmation, analytics,
//!   admin moderation, settings, feeds, SSO and sitemaps
//! - **Extractors**: authenticated and administrator users
//! - **Middleware**: bearer token authentication
//! - **Response**: the `{"status": ...}` JSON envelope
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

use axum::{Router, middleware::from_fn_with_state};
use tower_http::trace::TraceLayer;

pub use endpoints::{router, sitemaps_router};
pub use middleware::AppState;

/// Full application: API and sitemap routes behind authentication and tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", router())
        .nest("/sitemaps", sitemaps_router())
        .layer(from_fn_with_state(state.clone(), middleware::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
