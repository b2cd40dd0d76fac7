//! Cached graph aggregates.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fred::clients::Client as RedisClient;
use fred::interfaces::KeysInterface;
use minds_common::{AppError, AppResult};
use tracing::{debug, info, warn};

use super::onchain_boosts::{AggregateValue, DEFAULT_SPAN, OnchainBoostsAggregate, OnchainKey};
use super::window::TimeUnit;

/// Storage for computed graphs. Entries live until overwritten.
#[async_trait]
pub trait GraphCache: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;
    async fn set(&self, key: &str, value: String) -> AppResult<()>;
}

/// Shared graph cache handle.
pub type GraphCacheService = Arc<dyn GraphCache>;

/// Redis-backed graph cache.
#[derive(Clone)]
pub struct RedisGraphCache {
    redis: Arc<RedisClient>,
    prefix: String,
}

impl RedisGraphCache {
    #[must_use]
    pub fn new(redis: Arc<RedisClient>, prefix: impl Into<String>) -> Self {
        Self {
            redis,
            prefix: prefix.into(),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{key}", self.prefix)
    }
}

#[async_trait]
impl GraphCache for RedisGraphCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.redis
            .get::<Option<String>, _>(self.key(key))
            .await
            .map_err(|e| AppError::Redis(e.to_string()))
    }

    async fn set(&self, key: &str, value: String) -> AppResult<()> {
        self.redis
            .set::<(), _, _>(self.key(key), value, None, None, false)
            .await
            .map_err(|e| AppError::Redis(e.to_string()))
    }
}

/// Graph aggregates, selected by URL segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateKind {
    OnchainBoosts,
}

impl AggregateKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OnchainBoosts => "onchainboosts",
        }
    }
}

impl FromStr for AggregateKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "onchainboosts" => Ok(Self::OnchainBoosts),
            other => Err(AppError::NotFound(format!("Unknown aggregate: {other}"))),
        }
    }
}

/// Options for a single graph lookup.
#[derive(Debug, Clone, Copy)]
pub struct GraphOptions {
    pub key: OnchainKey,
    pub unit: TimeUnit,
    pub span: u32,
    pub ignore_cache: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            key: OnchainKey::Graph,
            unit: TimeUnit::Day,
            span: DEFAULT_SPAN,
            ignore_cache: false,
        }
    }
}

/// Key under which a synced result is reported: `{aggregate}:{key}:{unit}`.
#[must_use]
pub fn build_key(aggregate: AggregateKind, key: OnchainKey, unit: TimeUnit) -> String {
    format!(
        "{}:{}:{}",
        aggregate.as_str(),
        key.as_str().unwrap_or_default(),
        unit.as_str()
    )
}

/// Graph lookups with a cache in front of the search backend.
#[derive(Clone)]
pub struct GraphsService {
    onchain_boosts: OnchainBoostsAggregate,
    cache: GraphCacheService,
}

impl GraphsService {
    #[must_use]
    pub fn new(onchain_boosts: OnchainBoostsAggregate, cache: GraphCacheService) -> Self {
        Self {
            onchain_boosts,
            cache,
        }
    }

    /// Fetch a graph, serving from cache unless `ignore_cache` is set.
    ///
    /// Cache entries hold the default span only; other spans always hit the
    /// backend and leave the cache untouched.
    pub async fn get(
        &self,
        aggregate: AggregateKind,
        opts: GraphOptions,
        now: DateTime<Utc>,
    ) -> AppResult<AggregateValue> {
        let cache_key = match aggregate {
            AggregateKind::OnchainBoosts => OnchainBoostsAggregate::cache_key(opts.key, opts.unit),
        };
        let cacheable = opts.span == DEFAULT_SPAN;

        if cacheable && !opts.ignore_cache {
            if let Some(cached) = self.cache.get(&cache_key).await? {
                match serde_json::from_str(&cached) {
                    Ok(value) => {
                        debug!(key = %cache_key, "Graph cache hit");
                        return Ok(value);
                    }
                    Err(e) => warn!(key = %cache_key, error = %e, "Discarding unreadable cached graph"),
                }
            }
        }

        let value = match aggregate {
            AggregateKind::OnchainBoosts => {
                self.onchain_boosts
                    .fetch(opts.key, opts.unit, opts.span, now)
                    .await?
            }
        };

        if cacheable {
            self.store(&cache_key, &value).await?;
        }
        Ok(value)
    }

    /// Recompute every graph of an aggregate and refresh the cache.
    pub async fn sync(
        &self,
        aggregate: AggregateKind,
        now: DateTime<Utc>,
    ) -> AppResult<BTreeMap<String, AggregateValue>> {
        let result = match aggregate {
            AggregateKind::OnchainBoosts => {
                self.onchain_boosts
                    .fetch_all(now, |key, unit| build_key(aggregate, key, unit))
                    .await?
            }
        };

        for key in OnchainKey::ALL {
            for unit in TimeUnit::ALL {
                if let Some(value) = result.get(&build_key(aggregate, key, unit)) {
                    let cache_key = OnchainBoostsAggregate::cache_key(key, unit);
                    self.store(&cache_key, value).await?;
                }
            }
        }

        info!(aggregate = aggregate.as_str(), graphs = result.len(), "Graphs synced");
        Ok(result)
    }

    async fn store(&self, cache_key: &str, value: &AggregateValue) -> AppResult<()> {
        let raw = serde_json::to_string(value).map_err(|e| AppError::Internal(e.to_string()))?;
        self.cache.set(cache_key, raw).await
    }
}
