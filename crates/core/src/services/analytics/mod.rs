//! Analytics: on-chain boost graphs and dashboards over the search backend.

mod dashboards;
mod graphs;
mod onchain_boosts;
mod window;

pub use dashboards::{DashboardKind, DashboardsService, Metric, Timespan, TrafficDashboard};
pub use graphs::{
    AggregateKind, GraphCache, GraphCacheService, GraphOptions, GraphsService, RedisGraphCache,
    build_key,
};
pub use onchain_boosts::{AggregateValue, DEFAULT_SPAN, OnchainBoostsAggregate, OnchainKey, Series};
pub use window::{TimeUnit, TimeWindow};
