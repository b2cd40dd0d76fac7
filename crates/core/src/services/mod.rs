//! Business logic services.

#![allow(missing_docs)]

pub mod acl;
pub mod analytics;
pub mod channels;
pub mod email_confirmation;
pub mod events;
pub mod feeds;
pub mod moderation;
pub mod permissions;
pub mod queue;
pub mod search;
pub mod sitemaps;
pub mod sso;
pub mod users;
pub mod votes;
pub mod youtube_importer;

pub use acl::{Acl, AclContext, AclHandle, AclService};
pub use analytics::{
    AggregateKind, AggregateValue, DashboardKind, DashboardsService, GraphCache, GraphCacheService,
    DEFAULT_SPAN, GraphOptions, GraphsService, OnchainBoostsAggregate, OnchainKey, RedisGraphCache, Series,
    TimeUnit, TimeWindow, Timespan, TrafficDashboard,
};
pub use channels::ChannelService;
pub use email_confirmation::EmailConfirmationService;
pub use events::{DomainEvent, EventBus, EventDispatcher, EventDispatcherService, NoOpEventDispatcher};
pub use feeds::{Period, ScoredGuid, TopFeedOptions, TopFeedService};
pub use moderation::{NoOpPaymentsConnect, NsfwService, PaymentsConnect, PaymentsConnectService};
pub use permissions::{AccessScope, Flag, Permissions, PermissionsService, Role};
pub use queue::{NoOpQueueClient, QueueClient, QueueClientService, QueueMessage};
pub use search::{ElasticsearchClient, Scroll, SearchClient, SearchClientService, SearchIndexer, SearchRequest};
pub use sitemaps::{EntitiesResolver, MAX_URLS, ResolverKind, SitemapUrl, SitemapsService};
pub use sso::{ProDomain, ProDomainHandle, ProDomainService, SsoService};
pub use users::{UserService, hash_password, verify_password};
pub use votes::{Vote, VoteOptions, VoteService, direction_name, parse_direction};
pub use youtube_importer::{VideoImport, YouTubeImportService};
