//! On-chain boost transaction aggregates.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use minds_common::AppResult;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use super::window::{TimeUnit, TimeWindow};
use crate::services::search::{SearchClientService, SearchRequest};

/// Default number of units a query reaches back.
pub const DEFAULT_SPAN: u32 = 12;

/// Which figure to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OnchainKey {
    /// Average transactions per bucket.
    Average,
    /// Average `tokenValue` sum per bucket.
    AverageReclaimedTokens,
    /// Average distinct senders per bucket.
    AverageUsers,
    /// Per-bucket series instead of an average.
    Graph,
}

impl OnchainKey {
    pub const ALL: [Self; 4] = [
        Self::Average,
        Self::AverageReclaimedTokens,
        Self::AverageUsers,
        Self::Graph,
    ];

    /// Unknown or missing keys select the graph.
    #[must_use]
    pub fn parse(key: Option<&str>) -> Self {
        match key {
            Some("average") => Self::Average,
            Some("average_reclaimed_tokens") => Self::AverageReclaimedTokens,
            Some("average_users") => Self::AverageUsers,
            _ => Self::Graph,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::Average => Some("average"),
            Self::AverageReclaimedTokens => Some("average_reclaimed_tokens"),
            Self::AverageUsers => Some("average_users"),
            Self::Graph => None,
        }
    }
}

/// Chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
}

impl Series {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            x: Vec::new(),
            y: Vec::new(),
        }
    }
}

/// Result of an aggregate: a single average or a set of series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AggregateValue {
    Scalar(f64),
    Series(Vec<Series>),
}

fn filters(window: &TimeWindow, graph: bool) -> Vec<Value> {
    let category = json!({ "match_phrase": { "transactionCategory": { "query": "boost" } } });
    let function = json!({ "match_phrase": { "function": { "query": "approveAndCall" } } });
    let token = json!({ "match_phrase": { "isTokenTransaction": { "query": true } } });

    let mut must = vec![json!({ "match_all": {} }), window.range_filter(), category];
    if graph {
        must.extend([token, function]);
    } else {
        must.extend([function, token]);
    }
    must
}

fn histogram(window: &TimeWindow) -> Value {
    json!({
        "field": "@timestamp",
        "interval": window.interval,
        "min_doc_count": 1,
    })
}

/// Query body for a key over a window.
#[must_use]
pub fn build_query(key: OnchainKey, window: &TimeWindow) -> Value {
    let aggs = match key {
        OnchainKey::Average => json!({
            "avg": { "avg_bucket": { "buckets_path": "1-bucket>_count" } },
            "1-bucket": { "date_histogram": histogram(window) },
        }),
        OnchainKey::AverageReclaimedTokens => json!({
            "avg": { "avg_bucket": { "buckets_path": "1-bucket>1-metric" } },
            "1-bucket": {
                "date_histogram": histogram(window),
                "aggs": { "1-metric": { "sum": { "field": "tokenValue" } } },
            },
        }),
        OnchainKey::AverageUsers => json!({
            "avg": { "avg_bucket": { "buckets_path": "1-bucket>1-metric" } },
            "1-bucket": {
                "date_histogram": histogram(window),
                "aggs": { "1-metric": { "cardinality": { "field": "from" } } },
            },
        }),
        OnchainKey::Graph => json!({
            "histogram": {
                "date_histogram": histogram(window),
                "aggs": {
                    "sums": { "sum": { "field": "tokenValue" } },
                    "unique": { "cardinality": { "field": "from" } },
                },
            },
        }),
    };

    json!({
        "size": 0,
        "stored_fields": ["*"],
        "docvalue_fields": [{ "field": "@timestamp", "format": "date_time" }],
        "query": { "bool": { "must": filters(window, key == OnchainKey::Graph) } },
        "aggs": aggs,
    })
}

fn number(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(0.0)
}

/// Three series (reclaimed tokens, transactions, users) from histogram buckets.
#[must_use]
pub fn reshape_graph(response: &Value, window: &TimeWindow) -> Vec<Series> {
    let mut tokens = Series::named("Reclaimed Tokens from OnChain Boosts");
    let mut transactions = Series::named("Number of OnChain Boosts Transactions");
    let mut users = Series::named("Number of Users that used OnChain Boosts");

    let buckets = response
        .pointer("/aggregations/histogram/buckets")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for bucket in buckets {
        let date = window.label(bucket.get("key").and_then(Value::as_i64).unwrap_or(0));

        tokens.x.push(date.clone());
        tokens.y.push(number(bucket.pointer("/sums/value")));

        transactions.x.push(date.clone());
        transactions.y.push(number(bucket.get("doc_count")));

        users.x.push(date);
        users.y.push(number(bucket.pointer("/unique/value")));
    }

    vec![tokens, transactions, users]
}

/// Boost transactions recorded on chain.
#[derive(Clone)]
pub struct OnchainBoostsAggregate {
    client: SearchClientService,
    index: String,
}

impl OnchainBoostsAggregate {
    #[must_use]
    pub fn new(client: SearchClientService, index: impl Into<String>) -> Self {
        Self {
            client,
            index: index.into(),
        }
    }

    #[must_use]
    pub fn cache_key(key: OnchainKey, unit: TimeUnit) -> String {
        format!(
            "onchain:boosts:{}:{}",
            key.as_str().unwrap_or_default(),
            unit.as_str()
        )
    }

    pub async fn fetch(
        &self,
        key: OnchainKey,
        unit: TimeUnit,
        span: u32,
        now: DateTime<Utc>,
    ) -> AppResult<AggregateValue> {
        let window = TimeWindow::resolve(unit, span, now)?;
        let body = build_query(key, &window);

        debug!(key = ?key, unit = unit.as_str(), span, "Querying on-chain boosts");
        let response = self
            .client
            .search(SearchRequest::new(self.index.clone(), body))
            .await?;

        Ok(match key {
            OnchainKey::Graph => AggregateValue::Series(reshape_graph(&response, &window)),
            _ => AggregateValue::Scalar(number(response.pointer("/aggregations/avg/value"))),
        })
    }

    /// Every key for both units, keyed by `key_fn(key, unit)`.
    pub async fn fetch_all<F>(&self, now: DateTime<Utc>, key_fn: F) -> AppResult<BTreeMap<String, AggregateValue>>
    where
        F: Fn(OnchainKey, TimeUnit) -> String,
    {
        let mut result = BTreeMap::new();
        for key in OnchainKey::ALL {
            for unit in TimeUnit::ALL {
                let value = self.fetch(key, unit, DEFAULT_SPAN, now).await?;
                result.insert(key_fn(key, unit), value);
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_fixtures::ScriptedSearch;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 13, 0, 0).unwrap()
    }

    #[test]
    fn test_key_parse() {
        assert_eq!(OnchainKey::parse(Some("average")), OnchainKey::Average);
        assert_eq!(OnchainKey::parse(Some("average_users")), OnchainKey::AverageUsers);
        assert_eq!(OnchainKey::parse(Some("bogus")), OnchainKey::Graph);
        assert_eq!(OnchainKey::parse(None), OnchainKey::Graph);
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(
            OnchainBoostsAggregate::cache_key(OnchainKey::Average, TimeUnit::Day),
            "onchain:boosts:average:day"
        );
        assert_eq!(
            OnchainBoostsAggregate::cache_key(OnchainKey::Graph, TimeUnit::Month),
            "onchain:boosts::month"
        );
    }

    #[test]
    fn test_average_query_shape() {
        let window = TimeWindow::resolve(TimeUnit::Day, 12, now()).unwrap();
        let query = build_query(OnchainKey::Average, &window);

        assert_eq!(query["size"], 0);
        assert_eq!(query["aggs"]["avg"]["avg_bucket"]["buckets_path"], "1-bucket>_count");
        assert_eq!(query["aggs"]["1-bucket"]["date_histogram"]["interval"], "1d");
        assert_eq!(query["aggs"]["1-bucket"]["date_histogram"]["min_doc_count"], 1);

        let must = query["query"]["bool"]["must"].as_array().unwrap();
        assert_eq!(must.len(), 5);
        assert_eq!(must[1]["range"]["@timestamp"]["gte"], window.from.timestamp() * 1000);
        assert_eq!(must[2]["match_phrase"]["transactionCategory"]["query"], "boost");
    }

    #[test]
    fn test_metric_queries() {
        let window = TimeWindow::resolve(TimeUnit::Month, 12, now()).unwrap();

        let tokens = build_query(OnchainKey::AverageReclaimedTokens, &window);
        assert_eq!(tokens["aggs"]["1-bucket"]["aggs"]["1-metric"]["sum"]["field"], "tokenValue");
        assert_eq!(tokens["aggs"]["1-bucket"]["date_histogram"]["interval"], "1M");

        let users = build_query(OnchainKey::AverageUsers, &window);
        assert_eq!(users["aggs"]["1-bucket"]["aggs"]["1-metric"]["cardinality"]["field"], "from");
        assert_eq!(users["aggs"]["avg"]["avg_bucket"]["buckets_path"], "1-bucket>1-metric");
    }

    #[test]
    fn test_reshape_graph() {
        let window = TimeWindow::resolve(TimeUnit::Day, 12, now()).unwrap();
        let response = json!({
            "aggregations": { "histogram": { "buckets": [
                { "key": 1_710_460_800_000_i64, "doc_count": 4, "sums": { "value": 12.5 }, "unique": { "value": 3 } },
                { "key": 1_710_374_400_000_i64, "doc_count": 1, "sums": { "value": null }, "unique": {} },
            ] } }
        });

        let series = reshape_graph(&response, &window);

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].name, "Reclaimed Tokens from OnChain Boosts");
        assert_eq!(series[0].x, vec!["24-03-15".to_string(), "24-03-14".to_string()]);
        assert_eq!(series[0].y, vec![12.5, 0.0]);
        assert_eq!(series[1].y, vec![4.0, 1.0]);
        assert_eq!(series[2].y, vec![3.0, 0.0]);
    }

    #[test]
    fn test_reshape_graph_without_buckets() {
        let window = TimeWindow::resolve(TimeUnit::Day, 12, now()).unwrap();
        let series = reshape_graph(&json!({}), &window);

        assert!(series.iter().all(|s| s.x.is_empty() && s.y.is_empty()));
    }

    #[tokio::test]
    async fn test_fetch_scalar_defaults_to_zero() {
        let search = ScriptedSearch::new(vec![json!({ "aggregations": { "avg": { "value": 2.5 } } }), json!({})]);
        let aggregate = OnchainBoostsAggregate::new(Arc::new(search.clone()), "minds-transactions-onchain*");

        let first = aggregate.fetch(OnchainKey::Average, TimeUnit::Day, 12, now()).await.unwrap();
        let second = aggregate.fetch(OnchainKey::AverageUsers, TimeUnit::Day, 12, now()).await.unwrap();

        assert_eq!(first, AggregateValue::Scalar(2.5));
        assert_eq!(second, AggregateValue::Scalar(0.0));
        assert_eq!(search.requests()[0]["index"], "minds-transactions-onchain*");
    }

    #[tokio::test]
    async fn test_fetch_all_covers_every_key_and_unit() {
        let search = ScriptedSearch::new(vec![json!({}); 8]);
        let aggregate = OnchainBoostsAggregate::new(Arc::new(search.clone()), "minds-transactions-onchain*");

        let all = aggregate
            .fetch_all(now(), |key, unit| format!("{}:{}", key.as_str().unwrap_or_default(), unit.as_str()))
            .await
            .unwrap();

        assert_eq!(all.len(), 8);
        assert_eq!(all["average:day"], AggregateValue::Scalar(0.0));
        assert!(matches!(all[":month"], AggregateValue::Series(_)));
        assert_eq!(search.requests().len(), 8);
    }
}
