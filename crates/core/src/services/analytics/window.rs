//! Time windows for bucketed analytics queries.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use minds_common::{AppError, AppResult};

/// Bucket size of an aggregate query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Day,
    Month,
}

impl TimeUnit {
    pub const ALL: [Self; 2] = [Self::Day, Self::Month];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
        }
    }
}

impl FromStr for TimeUnit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "month" => Ok(Self::Month),
            other => Err(AppError::Config(format!("{other} is not an accepted unit"))),
        }
    }
}

/// Resolved `[from, to]` range with its histogram interval and bucket label format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub interval: &'static str,
    pub label_format: &'static str,
}

impl TimeWindow {
    /// Day windows end at the most recent midnight; month windows end at
    /// midnight on the first day of next month. Both reach back `span` units;
    /// a span reaching past the representable calendar is a bad request.
    pub fn resolve(unit: TimeUnit, span: u32, now: DateTime<Utc>) -> AppResult<Self> {
        let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();

        match unit {
            TimeUnit::Day => {
                let from = Duration::try_days(i64::from(span))
                    .and_then(|back| midnight.checked_sub_signed(back))
                    .ok_or_else(|| out_of_range(span))?;

                Ok(Self {
                    from,
                    to: midnight,
                    interval: "1d",
                    label_format: "%y-%m-%d",
                })
            }
            TimeUnit::Month => {
                let to = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
                    .and_then(|first| first.checked_add_months(Months::new(1)))
                    .map(|d| d.and_time(NaiveTime::MIN).and_utc())
                    .ok_or_else(|| out_of_range(span))?;
                let from = to
                    .checked_sub_months(Months::new(span))
                    .ok_or_else(|| out_of_range(span))?;

                Ok(Self {
                    from,
                    to,
                    interval: "1M",
                    label_format: "%y-%m",
                })
            }
        }
    }

    /// `@timestamp` range filter in epoch milliseconds.
    #[must_use]
    pub fn range_filter(&self) -> serde_json::Value {
        serde_json::json!({
            "range": {
                "@timestamp": {
                    "gte": self.from.timestamp() * 1000,
                    "lte": self.to.timestamp() * 1000,
                    "format": "epoch_millis",
                }
            }
        })
    }

    /// Label for a histogram bucket key (epoch millis).
    #[must_use]
    pub fn label(&self, key_millis: i64) -> String {
        DateTime::<Utc>::from_timestamp(key_millis / 1000, 0)
            .map(|d| d.format(self.label_format).to_string())
            .unwrap_or_default()
    }
}

fn out_of_range(span: u32) -> AppError {
    AppError::BadRequest(format!("Span {span} is out of range"))
}
