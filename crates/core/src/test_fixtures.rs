//! Shared fixtures and fakes for unit tests.

#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::Utc;
use minds_common::{AppError, AppResult};
use minds_db::entities::{entity, entity::EntityType, user};
use sea_orm::MockExecResult;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

use crate::services::acl::{Acl, AclContext};
use crate::services::events::{DomainEvent, EventDispatcher};
use crate::services::queue::{QueueClient, QueueMessage};
use crate::services::search::{SearchClient, SearchRequest};

pub fn user(guid: i64) -> user::Model {
    user::Model {
        guid,
        username: format!("user{guid}"),
        name: None,
        email: format!("user{guid}@example.com"),
        password: String::new(),
        token: Some(format!("token{guid}")),
        is_admin: false,
        is_banned: false,
        is_deleted: false,
        email_confirmation_token: None,
        email_confirmed_at: None,
        merchant: false,
        pro_domain: None,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

pub fn confirmed_user(guid: i64) -> user::Model {
    let mut u = user(guid);
    u.email_confirmed_at = Some(Utc::now().into());
    u
}

pub fn entity(guid: i64, owner_guid: i64, access_id: &str) -> entity::Model {
    entity::Model {
        guid,
        entity_type: EntityType::Activity,
        subtype: None,
        owner_guid,
        access_id: access_id.to_string(),
        entity_guid: None,
        nsfw: json!([]),
        nsfw_lock: json!([]),
        votes_up: 0,
        votes_down: 0,
        message: Some("hello #minds".to_string()),
        title: None,
        custom_type: None,
        license: None,
        rating: 1,
        pending: false,
        transcoding_status: None,
        youtube_id: None,
        time_created: Utc::now().into(),
        time_updated: None,
    }
}

pub const fn exec_ok() -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: 1,
    }
}

#[derive(Clone, Copy)]
enum AclMode {
    Allow,
    Deny,
    Unverified,
}

/// ACL returning a fixed answer and recording requested actions.
#[derive(Clone)]
pub struct StaticAcl {
    mode: AclMode,
    actions: Arc<Mutex<Vec<String>>>,
}

impl StaticAcl {
    fn with_mode(mode: AclMode) -> Self {
        Self {
            mode,
            actions: Arc::default(),
        }
    }

    pub fn allow() -> Self {
        Self::with_mode(AclMode::Allow)
    }

    pub fn deny() -> Self {
        Self::with_mode(AclMode::Deny)
    }

    pub fn unverified() -> Self {
        Self::with_mode(AclMode::Unverified)
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }

    fn answer(&self) -> AppResult<bool> {
        match self.mode {
            AclMode::Allow => Ok(true),
            AclMode::Deny => Ok(false),
            AclMode::Unverified => Err(AppError::UnverifiedEmail),
        }
    }
}

#[async_trait]
impl Acl for StaticAcl {
    async fn interact(
        &self,
        _entity: &entity::Model,
        _actor: &user::Model,
        action: &str,
    ) -> AppResult<bool> {
        self.actions.lock().unwrap().push(action.to_string());
        self.answer()
    }

    async fn write(
        &self,
        _entity: &entity::Model,
        _actor: &user::Model,
        ctx: &AclContext,
    ) -> AppResult<bool> {
        self.actions
            .lock()
            .unwrap()
            .push(format!("write:bypass={}", ctx.is_bypassed()));
        self.answer()
    }
}

/// Dispatcher recording event names.
#[derive(Clone, Default)]
pub struct RecordingDispatcher {
    events: Arc<Mutex<Vec<DomainEvent>>>,
}

impl RecordingDispatcher {
    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(DomainEvent::name).collect()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventDispatcher for RecordingDispatcher {
    async fn trigger(&self, event: DomainEvent) -> AppResult<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

/// Queue recording sent messages.
#[derive(Clone, Default)]
pub struct RecordingQueue {
    messages: Arc<Mutex<Vec<QueueMessage>>>,
}

impl RecordingQueue {
    pub fn messages(&self) -> Vec<QueueMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueueClient for RecordingQueue {
    async fn send(&self, message: QueueMessage) -> AppResult<()> {
        self.messages.lock().unwrap().push(message);
        Ok(())
    }
}

/// Search client replaying canned responses in order and recording requests.
#[derive(Clone, Default)]
pub struct ScriptedSearch {
    responses: Arc<Mutex<Vec<Value>>>,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl ScriptedSearch {
    pub fn new(responses: Vec<Value>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    fn next(&self, request: Value) -> AppResult<Value> {
        self.requests.lock().unwrap().push(request);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(AppError::Search("no scripted response".to_string()));
        }
        Ok(responses.remove(0))
    }
}

#[async_trait]
impl SearchClient for ScriptedSearch {
    async fn search(&self, request: SearchRequest) -> AppResult<Value> {
        self.next(json!({ "op": "search", "index": request.index, "body": request.body }))
    }

    async fn scroll_start(&self, request: SearchRequest, keep_alive: &str) -> AppResult<Value> {
        self.next(json!({
            "op": "scroll_start",
            "index": request.index,
            "body": request.body,
            "scroll": keep_alive,
        }))
    }

    async fn scroll_next(&self, scroll_id: &str, keep_alive: &str) -> AppResult<Value> {
        self.next(json!({ "op": "scroll_next", "scroll_id": scroll_id, "scroll": keep_alive }))
    }

    async fn clear_scroll(&self, scroll_id: &str) -> AppResult<()> {
        self.requests
            .lock()
            .unwrap()
            .push(json!({ "op": "clear_scroll", "scroll_id": scroll_id }));
        Ok(())
    }

    async fn index_document(&self, index: &str, id: &str, document: Value) -> AppResult<()> {
        self.requests.lock().unwrap().push(json!({
            "op": "index",
            "index": index,
            "id": id,
            "document": document,
        }));
        Ok(())
    }
}
