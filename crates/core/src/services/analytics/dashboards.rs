//! Analytics dashboards.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use minds_common::{AppError, AppResult};
use serde::Serialize;
use serde_json::{Value, json};

use crate::services::search::{SearchClientService, SearchRequest};

/// Dashboards, selected by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardKind {
    Traffic,
}

impl FromStr for DashboardKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "traffic" => Ok(Self::Traffic),
            other => Err(AppError::NotFound(format!("Unknown dashboard: {other}"))),
        }
    }
}

/// Period a dashboard covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timespan {
    Today,
    #[default]
    ThirtyDays,
    TwelveMonths,
}

impl Timespan {
    pub const ALL: [Self; 3] = [Self::Today, Self::ThirtyDays, Self::TwelveMonths];

    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::ThirtyDays => "30d",
            Self::TwelveMonths => "12m",
        }
    }

    const fn interval(&self) -> &'static str {
        match self {
            Self::Today => "1h",
            Self::ThirtyDays => "1d",
            Self::TwelveMonths => "1M",
        }
    }

    /// Start of the period.
    fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        match self {
            Self::Today => midnight,
            Self::ThirtyDays => midnight - Duration::days(30),
            Self::TwelveMonths => NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
                .and_then(|d| d.checked_sub_months(Months::new(11)))
                .map_or(midnight, |d| d.and_time(NaiveTime::MIN).and_utc()),
        }
    }
}

impl FromStr for Timespan {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.id() == s)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown timespan: {s}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub key: i64,
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub id: &'static str,
    pub label: &'static str,
    pub total: f64,
    pub buckets: Vec<Bucket>,
}

/// Active users and page views from the metrics index.
#[derive(Clone)]
pub struct TrafficDashboard {
    client: SearchClientService,
    index: String,
}

impl TrafficDashboard {
    #[must_use]
    pub fn new(client: SearchClientService, index: impl Into<String>) -> Self {
        Self {
            client,
            index: index.into(),
        }
    }

    fn query(timespan: Timespan, now: DateTime<Utc>) -> Value {
        json!({
            "size": 0,
            "query": { "bool": { "must": [
                { "term": { "action": "pageview" } },
                { "range": { "@timestamp": {
                    "gte": timespan.start(now).timestamp() * 1000,
                    "lte": now.timestamp() * 1000,
                    "format": "epoch_millis",
                } } },
            ] } },
            "aggs": {
                "histogram": {
                    "date_histogram": {
                        "field": "@timestamp",
                        "interval": timespan.interval(),
                        "min_doc_count": 0,
                    },
                    "aggs": { "active_users": { "cardinality": { "field": "user_guid" } } },
                },
            },
        })
    }

    fn metrics(response: &Value) -> Vec<Metric> {
        let mut active = Metric {
            id: "active_users",
            label: "Active Users",
            total: 0.0,
            buckets: Vec::new(),
        };
        let mut views = Metric {
            id: "pageviews",
            label: "Pageviews",
            total: 0.0,
            buckets: Vec::new(),
        };

        let buckets = response
            .pointer("/aggregations/histogram/buckets")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for bucket in buckets {
            let key = bucket.get("key").and_then(Value::as_i64).unwrap_or(0);
            let date = bucket
                .get("key_as_string")
                .and_then(Value::as_str)
                .map_or_else(|| key.to_string(), ToString::to_string);
            let users = bucket.pointer("/active_users/value").and_then(Value::as_f64).unwrap_or(0.0);
            let count = bucket.get("doc_count").and_then(Value::as_f64).unwrap_or(0.0);

            active.buckets.push(Bucket {
                key,
                date: date.clone(),
                value: users,
            });
            views.buckets.push(Bucket {
                key,
                date,
                value: count,
            });
            views.total += count;
        }
        active.total = active.buckets.iter().map(|b| b.value).fold(0.0, f64::max);

        vec![active, views]
    }

    /// Dashboard export for a timespan.
    pub async fn export(&self, timespan: Timespan, now: DateTime<Utc>) -> AppResult<Value> {
        let response = self
            .client
            .search(SearchRequest::new(self.index.clone(), Self::query(timespan, now)))
            .await?;

        Ok(json!({
            "id": "traffic",
            "category": "traffic",
            "label": "Traffic",
            "timespan": timespan.id(),
            "timespans": Timespan::ALL.iter().map(Timespan::id).collect::<Vec<_>>(),
            "metrics": Self::metrics(&response),
        }))
    }
}

/// Dashboard lookup by kind.
#[derive(Clone)]
pub struct DashboardsService {
    traffic: TrafficDashboard,
}

impl DashboardsService {
    #[must_use]
    pub const fn new(traffic: TrafficDashboard) -> Self {
        Self { traffic }
    }

    pub async fn get(&self, kind: DashboardKind, timespan: Timespan, now: DateTime<Utc>) -> AppResult<Value> {
        match kind {
            DashboardKind::Traffic => self.traffic.export(timespan, now).await,
        }
    }
}
