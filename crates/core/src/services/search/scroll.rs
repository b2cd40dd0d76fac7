//! Scroll-cursor pagination as a lazy stream.

use std::sync::{Arc, Mutex};

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use minds_common::{AppError, AppResult};
use serde_json::Value;
use tracing::{debug, warn};

use super::client::{SearchClientService, SearchRequest};

enum Cursor {
    Start(SearchRequest),
    Next(String),
    Done,
}

/// Server-side cursor still open on the backend.
#[derive(Clone, Default)]
struct OpenCursor(Arc<Mutex<Option<String>>>);

impl OpenCursor {
    fn set(&self, scroll_id: Option<String>) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = scroll_id;
        }
    }

    fn take(&self) -> Option<String> {
        self.0.lock().ok().and_then(|mut slot| slot.take())
    }
}

/// Releases the cursor of a stream dropped before its last page.
struct CursorGuard {
    client: SearchClientService,
    cursor: OpenCursor,
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        let Some(scroll_id) = self.cursor.take() else {
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!(scroll_id = %scroll_id, "No runtime, leaving cursor to expire");
            return;
        };

        let client = self.client.clone();
        handle.spawn(async move {
            if let Err(e) = client.clear_scroll(&scroll_id).await {
                warn!(scroll_id = %scroll_id, error = %e, "Failed to clear abandoned cursor");
            }
        });
    }
}

/// Walks every hit of a query page by page.
#[derive(Clone)]
pub struct Scroll {
    client: SearchClientService,
    keep_alive: String,
}

impl Scroll {
    #[must_use]
    pub fn new(client: SearchClientService, keep_alive: impl Into<String>) -> Self {
        Self {
            client,
            keep_alive: keep_alive.into(),
        }
    }

    /// Stream the raw hits of `request`.
    ///
    /// Nothing is fetched until the stream is polled. Each call opens a fresh
    /// cursor, released once a page comes back empty or, if the stream is
    /// dropped early, in a background task.
    pub fn request(&self, request: SearchRequest) -> BoxStream<'static, AppResult<Value>> {
        let client = self.client.clone();
        let keep_alive = self.keep_alive.clone();
        let guard = CursorGuard {
            client: client.clone(),
            cursor: OpenCursor::default(),
        };

        stream::try_unfold(Cursor::Start(request), move |cursor| {
            let client = client.clone();
            let keep_alive = keep_alive.clone();
            let open = guard.cursor.clone();
            async move {
                let page = match cursor {
                    Cursor::Start(request) => client.scroll_start(request, &keep_alive).await?,
                    Cursor::Next(scroll_id) => client.scroll_next(&scroll_id, &keep_alive).await?,
                    Cursor::Done => return Ok(None),
                };

                let scroll_id = page
                    .get("_scroll_id")
                    .and_then(Value::as_str)
                    .map(String::from);
                open.set(scroll_id.clone());
                let hits = page
                    .pointer("/hits/hits")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();

                if hits.is_empty() {
                    if let Some(id) = open.take() {
                        client.clear_scroll(&id).await?;
                    }
                    return Ok(None);
                }

                let next = scroll_id.map_or(Cursor::Done, Cursor::Next);
                Ok::<_, AppError>(Some((hits, next)))
            }
        })
        .map_ok(|hits| stream::iter(hits.into_iter().map(Ok::<_, AppError>)))
        .try_flatten()
        .boxed()
    }
}
