//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `minds_test`)
//!   `TEST_DB_PASSWORD` (default: `minds_test`)
//!   `TEST_DB_NAME` (default: `minds_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::Utc;
use minds_db::{
    entities::{entity, entity::EntityType, user, vote::VoteDirection},
    repositories::{EntityRepository, UserRepository, VoteRepository},
    test_utils::{TestDatabase, TestDbConfig},
};
use sea_orm::Set;
use serde_json::json;

async fn seed(db: TestDatabase) -> (UserRepository, EntityRepository, VoteRepository) {
    db.cleanup().await.unwrap();
    let conn = Arc::new(db.conn);
    let users = UserRepository::new(Arc::clone(&conn));
    let entities = EntityRepository::new(Arc::clone(&conn));
    let votes = VoteRepository::new(conn);

    users
        .create(user::ActiveModel {
            guid: Set(1),
            username: Set("alice".to_string()),
            name: Set(None),
            email: Set("alice@example.com".to_string()),
            password: Set("hash".to_string()),
            token: Set(Some("token".to_string())),
            is_admin: Set(false),
            is_banned: Set(false),
            is_deleted: Set(false),
            email_confirmation_token: Set(None),
            email_confirmed_at: Set(None),
            merchant: Set(false),
            pro_domain: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .unwrap();

    entities
        .create(entity::ActiveModel {
            guid: Set(100),
            entity_type: Set(EntityType::Activity),
            subtype: Set(None),
            owner_guid: Set(1),
            access_id: Set("2".to_string()),
            entity_guid: Set(None),
            nsfw: Set(json!([])),
            nsfw_lock: Set(json!([])),
            votes_up: Set(0),
            votes_down: Set(0),
            message: Set(Some("hello".to_string())),
            title: Set(None),
            custom_type: Set(None),
            license: Set(None),
            rating: Set(1),
            pending: Set(false),
            transcoding_status: Set(None),
            youtube_id: Set(None),
            time_created: Set(Utc::now().into()),
            time_updated: Set(None),
        })
        .await
        .unwrap();

    (users, entities, votes)
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_vote_index_is_unique_per_direction() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    let (_, _, votes) = seed(db).await;

    votes.insert(1, 100, VoteDirection::Up).await.unwrap();
    votes.insert(1, 100, VoteDirection::Up).await.unwrap();

    assert!(votes.exists(1, 100, VoteDirection::Up).await.unwrap());
    assert!(!votes.exists(1, 100, VoteDirection::Down).await.unwrap());

    votes.remove(1, 100, VoteDirection::Up).await.unwrap();
    assert!(!votes.exists(1, 100, VoteDirection::Up).await.unwrap());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_vote_counter_never_negative() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    let (_, entities, _) = seed(db).await;

    entities.update_vote_count(100, VoteDirection::Up, 1).await.unwrap();
    entities.update_vote_count(100, VoteDirection::Up, -1).await.unwrap();
    entities.update_vote_count(100, VoteDirection::Up, -1).await.unwrap();

    let entity = entities.get_by_guid(100).await.unwrap();
    assert_eq!(entity.votes_up, 0);
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_mark_deleted_revokes_token() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    let (users, _, _) = seed(db).await;

    users.mark_deleted(1).await.unwrap();

    assert!(users.find_by_token("token").await.unwrap().is_none());
    assert!(users.get_by_guid(1).await.unwrap().is_deleted);
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.database_url().starts_with("postgres://"));
}
