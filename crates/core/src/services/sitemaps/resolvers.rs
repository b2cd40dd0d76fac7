//! Concrete sitemap resolvers.

use chrono::DateTime;
use serde_json::Value;

use super::{EntitiesResolver, SitemapUrl};
use crate::services::search::Scroll;

fn last_modified(source: &Value) -> Option<String> {
    let secs = match source.get("time_created")? {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.parse().ok()?,
        _ => return None,
    };
    DateTime::from_timestamp(secs, 0).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Public activity posts at `newsfeed/{guid}`.
pub struct ActivityResolver {
    scroll: Scroll,
    index: String,
    site_url: String,
}

impl ActivityResolver {
    #[must_use]
    pub const fn new(scroll: Scroll, index: String, site_url: String) -> Self {
        Self {
            scroll,
            index,
            site_url,
        }
    }
}

impl EntitiesResolver for ActivityResolver {
    fn scroll(&self) -> &Scroll {
        &self.scroll
    }

    fn index(&self) -> &str {
        &self.index
    }

    fn type_filter(&self) -> &'static str {
        "activity"
    }

    fn to_url(&self, source: &Value) -> Option<SitemapUrl> {
        if source.get("access_id").and_then(Value::as_str) != Some("2") {
            return None;
        }
        let guid = source.get("guid").and_then(Value::as_str)?;

        Some(SitemapUrl {
            loc: format!("{}newsfeed/{guid}", self.site_url),
            last_modified: last_modified(source),
            change_freq: "never",
            priority: 0.5,
        })
    }
}

/// Channels at `{username}`.
pub struct UserResolver {
    scroll: Scroll,
    index: String,
    site_url: String,
}

impl UserResolver {
    #[must_use]
    pub const fn new(scroll: Scroll, index: String, site_url: String) -> Self {
        Self {
            scroll,
            index,
            site_url,
        }
    }
}

impl EntitiesResolver for UserResolver {
    fn scroll(&self) -> &Scroll {
        &self.scroll
    }

    fn index(&self) -> &str {
        &self.index
    }

    fn type_filter(&self) -> &'static str {
        "user"
    }

    fn to_url(&self, source: &Value) -> Option<SitemapUrl> {
        let username = source
            .get("username")
            .and_then(Value::as_str)
            .filter(|u| !u.is_empty())?;

        Some(SitemapUrl {
            loc: format!("{}{username}", self.site_url),
            last_modified: last_modified(source),
            change_freq: "daily",
            priority: 0.7,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_fixtures::ScriptedSearch;
    use serde_json::json;
    use std::sync::Arc;

    fn activity_resolver() -> ActivityResolver {
        ActivityResolver::new(
            Scroll::new(Arc::new(ScriptedSearch::default()), "2m"),
            "minds_badger".to_string(),
            "https://www.minds.com/".to_string(),
        )
    }

    #[test]
    fn test_public_activity_url() {
        let url = activity_resolver()
            .to_url(&json!({ "guid": "123", "access_id": "2", "time_created": "1700000000" }))
            .unwrap();

        assert_eq!(url.loc, "https://www.minds.com/newsfeed/123");
        assert_eq!(url.last_modified.as_deref(), Some("2023-11-14"));
    }

    #[test]
    fn test_non_public_activity_is_skipped() {
        assert!(activity_resolver()
            .to_url(&json!({ "guid": "123", "access_id": "1" }))
            .is_none());
        assert!(activity_resolver()
            .to_url(&json!({ "guid": "123", "access_id": "500" }))
            .is_none());
    }
}
