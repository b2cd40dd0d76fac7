//! Search client trait and its Elasticsearch implementation.

use async_trait::async_trait;
use minds_common::{AppError, AppResult};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A query against one index (or index pattern).
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub index: String,
    pub body: Value,
}

impl SearchRequest {
    #[must_use]
    pub fn new(index: impl Into<String>, body: Value) -> Self {
        Self {
            index: index.into(),
            body,
        }
    }
}

/// Request/response contract with the search backend.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run a search and return the raw response.
    async fn search(&self, request: SearchRequest) -> AppResult<Value>;

    /// Open a scroll cursor and return the first page.
    async fn scroll_start(&self, request: SearchRequest, keep_alive: &str) -> AppResult<Value>;

    /// Fetch the next page of an open cursor.
    async fn scroll_next(&self, scroll_id: &str, keep_alive: &str) -> AppResult<Value>;

    /// Release a cursor.
    async fn clear_scroll(&self, scroll_id: &str) -> AppResult<()>;

    /// Create or replace a document.
    async fn index_document(&self, index: &str, id: &str, document: Value) -> AppResult<()>;
}

/// Shared search client handle.
pub type SearchClientService = Arc<dyn SearchClient>;

/// Elasticsearch over its REST API.
#[derive(Clone)]
pub struct ElasticsearchClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ElasticsearchClient {
    /// Create a client for the cluster at `base_url`.
    pub fn new(base_url: &str) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Search(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> AppResult<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Search(format!("{status} - {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl SearchClient for ElasticsearchClient {
    async fn search(&self, request: SearchRequest) -> AppResult<Value> {
        debug!(index = %request.index, "Search");
        let url = format!("{}/{}/_search", self.base_url, request.index);
        self.send(self.http_client.post(url).json(&request.body)).await
    }

    async fn scroll_start(&self, request: SearchRequest, keep_alive: &str) -> AppResult<Value> {
        debug!(index = %request.index, keep_alive, "Open scroll");
        let url = format!("{}/{}/_search", self.base_url, request.index);
        self.send(
            self.http_client
                .post(url)
                .query(&[("scroll", keep_alive)])
                .json(&request.body),
        )
        .await
    }

    async fn scroll_next(&self, scroll_id: &str, keep_alive: &str) -> AppResult<Value> {
        let url = format!("{}/_search/scroll", self.base_url);
        self.send(
            self.http_client
                .post(url)
                .json(&json!({ "scroll": keep_alive, "scroll_id": scroll_id })),
        )
        .await
    }

    async fn clear_scroll(&self, scroll_id: &str) -> AppResult<()> {
        let url = format!("{}/_search/scroll", self.base_url);
        self.send(
            self.http_client
                .delete(url)
                .json(&json!({ "scroll_id": scroll_id })),
        )
        .await?;
        Ok(())
    }

    async fn index_document(&self, index: &str, id: &str, document: Value) -> AppResult<()> {
        debug!(index, id, "Index document");
        let url = format!("{}/{}/_doc/{}", self.base_url, index, id);
        self.send(self.http_client.put(url).json(&document)).await?;
        Ok(())
    }
}
