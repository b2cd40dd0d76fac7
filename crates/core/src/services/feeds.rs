//! Top feeds ranked by the search backend.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use minds_common::{AppError, AppResult};
use minds_db::entities::entity::EntityType;
use serde::Serialize;
use serde_json::{Value, json};

use crate::services::search::{SearchClientService, SearchRequest};

/// A guid with its ranking score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredGuid {
    guid: i64,
    score: f64,
    owner_guid: i64,
}

impl ScoredGuid {
    #[must_use]
    pub const fn new(guid: i64, score: f64, owner_guid: i64) -> Self {
        Self {
            guid,
            score,
            owner_guid,
        }
    }

    #[must_use]
    pub const fn guid(&self) -> i64 {
        self.guid
    }

    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub const fn owner_guid(&self) -> i64 {
        self.owner_guid
    }
}

/// How far back the ranking looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    TwelveHours,
    #[default]
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    fn duration(&self) -> Duration {
        match self {
            Self::TwelveHours => Duration::hours(12),
            Self::Day => Duration::hours(24),
            Self::Week => Duration::days(7),
            Self::Month => Duration::days(30),
            Self::Year => Duration::days(365),
        }
    }
}

impl FromStr for Period {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "12h" => Ok(Self::TwelveHours),
            "24h" => Ok(Self::Day),
            "7d" => Ok(Self::Week),
            "30d" => Ok(Self::Month),
            "1y" => Ok(Self::Year),
            other => Err(AppError::BadRequest(format!("Invalid period: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TopFeedOptions {
    pub entity_type: EntityType,
    pub period: Period,
    pub limit: u32,
    /// Include entities flagged with any NSFW reason.
    pub include_nsfw: bool,
}

impl Default for TopFeedOptions {
    fn default() -> Self {
        Self {
            entity_type: EntityType::Activity,
            period: Period::default(),
            limit: 12,
            include_nsfw: false,
        }
    }
}

/// Top feed service.
#[derive(Clone)]
pub struct TopFeedService {
    client: SearchClientService,
    index: String,
}

impl TopFeedService {
    #[must_use]
    pub fn new(client: SearchClientService, index: impl Into<String>) -> Self {
        Self {
            client,
            index: index.into(),
        }
    }

    fn query(opts: &TopFeedOptions, now: DateTime<Utc>) -> Value {
        let from = (now - opts.period.duration()).timestamp_millis();
        let mut must_not = vec![];
        if !opts.include_nsfw {
            must_not.push(json!({ "term": { "mature": true } }));
        }

        json!({
            "size": opts.limit.min(150),
            "_source": ["guid", "owner_guid"],
            "query": {
                "function_score": {
                    "query": {
                        "bool": {
                            "must": [
                                { "term": { "type": opts.entity_type.as_str() } },
                                { "term": { "access_id": "2" } },
                                { "range": { "@timestamp": { "gte": from } } },
                            ],
                            "must_not": must_not,
                        }
                    },
                    "script_score": {
                        "script": {
                            "source": "Math.max(doc['votes:up'].value - doc['votes:down'].value, 0)",
                        }
                    },
                    "boost_mode": "replace",
                }
            },
            "sort": [{ "_score": "desc" }],
        })
    }

    fn parse_guid(value: Option<&Value>) -> Option<i64> {
        match value? {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Ranked guids, best first.
    pub async fn get_list(&self, opts: &TopFeedOptions, now: DateTime<Utc>) -> AppResult<Vec<ScoredGuid>> {
        let response = self
            .client
            .search(SearchRequest::new(self.index.clone(), Self::query(opts, now)))
            .await?;

        let hits = response
            .pointer("/hits/hits")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        Ok(hits
            .iter()
            .filter_map(|hit| {
                let source = hit.get("_source")?;
                let guid = Self::parse_guid(source.get("guid"))?;
                let owner = Self::parse_guid(source.get("owner_guid")).unwrap_or(0);
                let score = hit.get("_score").and_then(Value::as_f64).unwrap_or(0.0);
                Some(ScoredGuid::new(guid, score, owner))
            })
            .collect())
    }
}
