//! Minds-rs server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use apalis::prelude::*;
use fred::prelude::*;
use minds_api::AppState;
use minds_common::Config;
use minds_core::{
    AclService, ChannelService, DashboardsService, ElasticsearchClient, EmailConfirmationService,
    EventBus, GraphsService, NoOpPaymentsConnect, NsfwService, OnchainBoostsAggregate,
    PermissionsService, ProDomainService, RedisGraphCache, Scroll, SearchClientService,
    SearchIndexer, SitemapsService, SsoService, TopFeedService, TrafficDashboard, UserService,
    VoteService, YouTubeImportService,
};
use minds_db::repositories::{
    EntityRepository, GroupRepository, SubscriptionRepository, UserRepository, VoteRepository,
};
use minds_queue::{
    RedisQueueClient, YOUTUBE_IMPORT_CONCURRENCY, YouTubeImportContext, youtube_import_worker,
};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minds=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting minds-rs server...");

    let config = Config::load()?;

    let db = minds_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    minds_db::migrate(&db).await?;
    info!("Migrations completed");
    let db = Arc::new(db);

    // Job queue storages
    let redis_client = redis::Client::open(config.redis.url.as_str())?;
    let redis_conn = redis::aio::ConnectionManager::new(redis_client).await?;
    let queue = RedisQueueClient::new(redis_conn);
    info!("Connected to Redis job queue");

    // Graph cache
    let fred_config = fred::types::config::Config::from_url(&config.redis.url)?;
    let fred_client = fred::clients::Client::new(fred_config, None, None, None);
    fred_client.connect();
    fred_client.wait_for_connect().await?;
    let fred_client = Arc::new(fred_client);
    info!("Connected to Redis cache");

    let es = &config.elasticsearch;
    let search: SearchClientService = Arc::new(ElasticsearchClient::new(&es.url)?);

    // Repositories
    let user_repo = UserRepository::new(Arc::clone(&db));
    let entity_repo = EntityRepository::new(Arc::clone(&db));
    let vote_repo = VoteRepository::new(Arc::clone(&db));
    let subscription_repo = SubscriptionRepository::new(Arc::clone(&db));
    let group_repo = GroupRepository::new(Arc::clone(&db));

    let mut event_bus = EventBus::new();
    event_bus.set_indexer(SearchIndexer::new(search.clone(), es.index.clone()));
    let event_bus = Arc::new(event_bus);
    let acl = Arc::new(AclService::new());
    let queue_client = Arc::new(queue.clone());

    let mut vote_service = VoteService::new(entity_repo.clone(), vote_repo, acl.clone());
    vote_service.set_dispatcher(event_bus.clone());

    let youtube_import_service = YouTubeImportService::new(entity_repo.clone(), user_repo.clone(), acl);

    let state = AppState {
        user_service: UserService::new(user_repo.clone()),
        vote_service,
        permissions_service: PermissionsService::new(
            entity_repo.clone(),
            subscription_repo,
            group_repo,
        ),
        email_confirmation_service: EmailConfirmationService::new(
            user_repo.clone(),
            queue_client,
            &config,
        ),
        graphs_service: GraphsService::new(
            OnchainBoostsAggregate::new(search.clone(), es.transactions_index.clone()),
            Arc::new(RedisGraphCache::new(fred_client, config.redis.prefix.clone())),
        ),
        dashboards_service: DashboardsService::new(TrafficDashboard::new(
            search.clone(),
            es.metrics_index.clone(),
        )),
        nsfw_service: NsfwService::new(
            entity_repo,
            user_repo.clone(),
            event_bus,
            Arc::new(NoOpPaymentsConnect),
        ),
        channel_service: ChannelService::new(user_repo.clone()),
        top_feed_service: TopFeedService::new(search.clone(), es.index.clone()),
        sso_service: SsoService::new(
            Arc::new(ProDomainService::new(config.sso.root_domains.clone(), user_repo)),
            &config,
        ),
        sitemaps_service: SitemapsService::new(
            Scroll::new(search, es.scroll_keep_alive.clone()),
            es.index.clone(),
            config.server.url.clone(),
        ),
    };

    let app = minds_api::app(state).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    );

    // YouTube importer, one job at a time
    info!("Starting YouTube importer worker...");
    let import_ctx = YouTubeImportContext::new(youtube_import_service);
    let import_storage = queue.youtube_import_storage();
    tokio::spawn(async move {
        let monitor = Monitor::new().register(
            WorkerBuilder::new("youtube-importer")
                .concurrency(YOUTUBE_IMPORT_CONCURRENCY)
                .data(import_ctx)
                .backend(import_storage)
                .build_fn(youtube_import_worker),
        );

        if let Err(e) = monitor.run().await {
            error!(error = %e, "YouTube importer worker failed");
        }
    });

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
