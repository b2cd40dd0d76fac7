//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use minds_core::{
    ChannelService, DashboardsService, EmailConfirmationService, GraphsService, NsfwService,
    PermissionsService, SitemapsService, SsoService, TopFeedService, UserService, VoteService,
};
use tracing::debug;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub vote_service: VoteService,
    pub permissions_service: PermissionsService,
    pub email_confirmation_service: EmailConfirmationService,
    pub graphs_service: GraphsService,
    pub dashboards_service: DashboardsService,
    pub nsfw_service: NsfwService,
    pub channel_service: ChannelService,
    pub top_feed_service: TopFeedService,
    pub sso_service: SsoService,
    pub sitemaps_service: SitemapsService,
}

/// Authentication middleware.
///
/// Resolves a `Bearer` access token to its user and stores the user in the
/// request extensions. Requests without a valid token pass through anonymous.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get(header::AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.user_service.authenticate_by_token(token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => debug!(error = %e, "Bearer token rejected"),
        }
    }

    next.run(req).await
}
