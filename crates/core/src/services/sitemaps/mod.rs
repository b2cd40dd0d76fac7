//! Sitemaps built from partial entity data held in the search index.
//!
//! Resolvers never hydrate entities from the database; they work from the
//! `_source` documents the index returns.

mod resolvers;

pub use resolvers::{ActivityResolver, UserResolver};

use std::str::FromStr;

use futures::{
    StreamExt, TryStreamExt,
    future,
    stream::BoxStream,
};
use minds_common::{AppError, AppResult};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use crate::services::search::{Scroll, SearchRequest};

/// Upper bound on URLs in one urlset document.
pub const MAX_URLS: usize = 50_000;

/// One `<url>` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapUrl {
    pub loc: String,
    pub last_modified: Option<String>,
    pub change_freq: &'static str,
    pub priority: f32,
}

/// Source of sitemap URLs for one entity type.
pub trait EntitiesResolver: Send + Sync {
    fn scroll(&self) -> &Scroll;

    fn index(&self) -> &str;

    /// Entity `type` the resolver walks.
    fn type_filter(&self) -> &'static str;

    fn sort(&self) -> Value {
        json!([{ "@timestamp": "desc" }])
    }

    /// Map a `_source` document to a URL, or skip it.
    fn to_url(&self, source: &Value) -> Option<SitemapUrl>;

    /// Lazy stream of `_source` documents. Each call starts a new scroll.
    fn raw_data(&self) -> BoxStream<'static, AppResult<Value>> {
        let body = json!({
            "query": {
                "bool": {
                    "must": [{ "match_all": {} }],
                    "filter": [{ "term": { "type": self.type_filter() } }],
                }
            },
            "sort": self.sort(),
        });

        self.scroll()
            .request(SearchRequest::new(self.index(), body))
            .map_ok(|hit| hit.get("_source").cloned().unwrap_or(Value::Null))
            .boxed()
    }

    fn urls(&self) -> BoxStream<'_, AppResult<SitemapUrl>> {
        self.raw_data()
            .try_filter_map(move |source| future::ready(Ok(self.to_url(&source))))
            .boxed()
    }
}

/// Resolvers, selected by URL segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverKind {
    Activities,
    Users,
}

impl FromStr for ResolverKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "activities" | "newsfeed" => Ok(Self::Activities),
            "users" | "channels" => Ok(Self::Users),
            other => Err(AppError::NotFound(format!("Unknown sitemap: {other}"))),
        }
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Render a `<urlset>` document.
#[must_use]
pub fn render_urlset(urls: &[SitemapUrl]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for url in urls {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape(&url.loc)));
        if let Some(ref lastmod) = url.last_modified {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", escape(lastmod)));
        }
        xml.push_str(&format!("    <changefreq>{}</changefreq>\n", url.change_freq));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", url.priority));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Builds sitemap documents.
#[derive(Clone)]
pub struct SitemapsService {
    scroll: Scroll,
    index: String,
    site_url: String,
}

impl SitemapsService {
    #[must_use]
    pub fn new(scroll: Scroll, index: impl Into<String>, site_url: impl Into<String>) -> Self {
        Self {
            scroll,
            index: index.into(),
            site_url: site_url.into(),
        }
    }

    #[must_use]
    pub fn resolver(&self, kind: ResolverKind) -> Box<dyn EntitiesResolver> {
        match kind {
            ResolverKind::Activities => Box::new(ActivityResolver::new(
                self.scroll.clone(),
                self.index.clone(),
                self.site_url.clone(),
            )),
            ResolverKind::Users => Box::new(UserResolver::new(
                self.scroll.clone(),
                self.index.clone(),
                self.site_url.clone(),
            )),
        }
    }

    /// Collect up to `limit` URLs of a resolver into a urlset. Stopping early
    /// drops the scroll stream, which releases its cursor.
    pub async fn render(&self, kind: ResolverKind, limit: usize) -> AppResult<String> {
        let resolver = self.resolver(kind);
        let urls: Vec<SitemapUrl> = resolver
            .urls()
            .take(limit.min(MAX_URLS))
            .try_collect()
            .await?;

        info!(resolver = ?kind, urls = urls.len(), "Sitemap rendered");
        Ok(render_urlset(&urls))
    }
}
