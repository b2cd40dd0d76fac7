//! Email confirmation tokens.
//!
//! A signed token binding the user guid to a one-time code is stored on the
//! user row and mailed out. Confirming checks the presented token against the
//! stored one, then clears it.

use chrono::Utc;
use minds_common::{AppError, AppResult, Config, IdGenerator, Jwt};
use minds_db::{entities::user, repositories::UserRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::services::queue::{QueueClientService, QueueMessage};

/// Length of the random one-time code.
const CODE_LENGTH: usize = 32;

#[derive(Debug, Serialize, Deserialize, Default)]
struct ConfirmationClaims {
    #[serde(default)]
    user_guid: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl ConfirmationClaims {
    fn fields(&self) -> Option<(&str, &str)> {
        let guid = self.user_guid.as_deref().filter(|s| !s.is_empty())?;
        let code = self.code.as_deref().filter(|s| !s.is_empty())?;
        Some((guid, code))
    }
}

/// Email confirmation service.
#[derive(Clone)]
pub struct EmailConfirmationService {
    user_repo: UserRepository,
    queue: QueueClientService,
    jwt: Jwt,
    expiration: i64,
    site_url: String,
    id_gen: IdGenerator,
}

impl EmailConfirmationService {
    #[must_use]
    pub fn new(user_repo: UserRepository, queue: QueueClientService, config: &Config) -> Self {
        Self {
            user_repo,
            queue,
            jwt: Jwt::new(config.email_confirmation.signing_key.clone()),
            expiration: config.email_confirmation.expiration,
            site_url: config.server.url.clone(),
            id_gen: IdGenerator::new(),
        }
    }

    /// Issue a fresh token, store it on the user and queue the confirmation email.
    pub async fn send_email(&self, user: &user::Model) -> AppResult<user::Model> {
        if user.is_email_confirmed() {
            return Err(AppError::Conflict(
                "User email was already confirmed".to_string(),
            ));
        }

        let now = Utc::now().timestamp();
        let claims = ConfirmationClaims {
            user_guid: Some(user.guid.to_string()),
            code: Some(self.id_gen.random_string(CODE_LENGTH)),
        };
        let token = self.jwt.encode(claims, now + self.expiration, now)?;

        let mut active: user::ActiveModel = user.clone().into();
        active.email_confirmation_token = Set(Some(token));
        active.updated_at = Set(Some(Utc::now().into()));
        let updated = self.user_repo.update(active).await?;

        self.queue
            .send(QueueMessage::ConfirmationEmail {
                user_guid: user.guid.to_string(),
            })
            .await?;

        info!(user = user.guid, "Confirmation email queued");
        Ok(updated)
    }

    /// Confirm the email of the user the token was issued to.
    pub async fn confirm(&self, token: &str) -> AppResult<bool> {
        let presented: ConfirmationClaims = self.jwt.decode(token)?;
        let (guid, code) = presented
            .fields()
            .ok_or_else(|| AppError::BadRequest("Invalid JWT".to_string()))?;

        let user = match guid.parse::<i64>() {
            Ok(guid) => self.user_repo.find_by_guid(guid).await?,
            Err(_) => None,
        }
        .ok_or_else(|| AppError::BadRequest("Invalid user".to_string()))?;

        if user.is_email_confirmed() {
            return Err(AppError::Conflict(
                "User email was already confirmed".to_string(),
            ));
        }

        let stored_token = user
            .email_confirmation_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::BadRequest("Invalid confirmation token data".to_string()))?;
        let stored: ConfirmationClaims = self.jwt.decode(stored_token)?;

        if stored.fields() != Some((guid, code)) {
            return Err(AppError::BadRequest(
                "Invalid confirmation token data".to_string(),
            ));
        }

        let user_guid = user.guid;
        let mut active: user::ActiveModel = user.into();
        active.email_confirmation_token = Set(None);
        active.email_confirmed_at = Set(Some(Utc::now().into()));
        active.updated_at = Set(Some(Utc::now().into()));
        self.user_repo.update(active).await?;

        self.queue
            .send(QueueMessage::WelcomeEmail {
                user_guid: user_guid.to_string(),
            })
            .await?;

        info!(user = user_guid, "Email confirmed");
        Ok(true)
    }

    /// Link the user follows to confirm. Extra params come before the token.
    pub fn generate_confirmation_url(
        &self,
        user: &user::Model,
        params: &[(&str, &str)],
    ) -> AppResult<String> {
        let mut url = Url::parse(&self.site_url)
            .and_then(|base| base.join("email-confirmation"))
            .map_err(|e| AppError::Config(format!("Invalid site url: {e}")))?;

        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            query.append_pair(
                "__e_cnf_token",
                user.email_confirmation_token.as_deref().unwrap_or_default(),
            );
        }

        Ok(url.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_fixtures::{RecordingQueue, confirmed_user, user};
    use minds_common::config::{
        DatabaseConfig, ElasticsearchConfig, EmailConfirmationConfig, RedisConfig, ServerConfig,
        SsoConfig,
    };
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    const KEY: &str = "confirmation-secret";

    fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                url: "https://www.minds.com/".to_string(),
            },
            database: DatabaseConfig {
                url: "postgres://localhost/test".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            redis: RedisConfig {
                url: "redis://localhost".to_string(),
                prefix: "minds".to_string(),
            },
            elasticsearch: ElasticsearchConfig {
                url: "http://localhost:9200".to_string(),
                index: "minds_badger".to_string(),
                metrics_index: "minds-metrics-*".to_string(),
                transactions_index: "minds-transactions-onchain*".to_string(),
                scroll_keep_alive: "2m".to_string(),
                page_size: 500,
            },
            email_confirmation: EmailConfirmationConfig {
                signing_key: KEY.to_string(),
                expiration: 3600,
            },
            sso: SsoConfig::default(),
        }
    }

    fn service(db: DatabaseConnection, queue: &RecordingQueue) -> EmailConfirmationService {
        EmailConfirmationService::new(
            UserRepository::new(Arc::new(db)),
            Arc::new(queue.clone()),
            &test_config(),
        )
    }

    fn token(user_guid: &str, code: &str) -> String {
        let now = Utc::now().timestamp();
        let claims = ConfirmationClaims {
            user_guid: Some(user_guid.to_string()),
            code: Some(code.to_string()),
        };
        Jwt::new(KEY).encode(claims, now + 3600, now).unwrap()
    }

    fn pending_user(guid: i64, code: &str) -> user::Model {
        let mut u = user(guid);
        u.email_confirmation_token = Some(token(&guid.to_string(), code));
        u
    }

    #[tokio::test]
    async fn test_send_email_stores_token_and_queues() {
        let mut stored = user(1);
        stored.email_confirmation_token = Some("stored".to_string());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored]])
            .into_connection();
        let queue = RecordingQueue::default();

        let updated = service(db, &queue).send_email(&user(1)).await.unwrap();

        assert_eq!(updated.email_confirmation_token.as_deref(), Some("stored"));
        assert_eq!(
            queue.messages(),
            vec![QueueMessage::ConfirmationEmail {
                user_guid: "1".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_send_email_rejects_confirmed_user() {
        let queue = RecordingQueue::default();
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db, &queue).send_email(&confirmed_user(1)).await;

        match result {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "User email was already confirmed"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(queue.messages().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_success() {
        let pending = pending_user(1, "abc");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pending]])
            .append_query_results([[confirmed_user(1)]])
            .into_connection();
        let queue = RecordingQueue::default();

        let confirmed = service(db, &queue).confirm(&token("1", "abc")).await.unwrap();

        assert!(confirmed);
        assert_eq!(
            queue.messages(),
            vec![QueueMessage::WelcomeEmail {
                user_guid: "1".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_confirm_rejects_mismatched_code() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pending_user(1, "abc")]])
            .into_connection();
        let queue = RecordingQueue::default();

        let result = service(db, &queue).confirm(&token("1", "other")).await;

        match result {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Invalid confirmation token data"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(queue.messages().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_rejects_already_confirmed() {
        let mut u = confirmed_user(1);
        u.email_confirmation_token = Some(token("1", "abc"));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[u]])
            .into_connection();
        let queue = RecordingQueue::default();

        let result = service(db, &queue).confirm(&token("1", "abc")).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert!(queue.messages().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_rejects_unknown_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let queue = RecordingQueue::default();

        let result = service(db, &queue).confirm(&token("1", "abc")).await;

        match result {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Invalid user"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_confirm_rejects_missing_claims() {
        let now = Utc::now().timestamp();
        let bare = Jwt::new(KEY)
            .encode(ConfirmationClaims::default(), now + 60, now)
            .unwrap();
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let queue = RecordingQueue::default();

        let result = service(db, &queue).confirm(&bare).await;

        match result {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Invalid JWT"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_confirm_rejects_expired_token() {
        let now = Utc::now().timestamp();
        let claims = ConfirmationClaims {
            user_guid: Some("1".to_string()),
            code: Some("abc".to_string()),
        };
        let expired = Jwt::new(KEY).encode(claims, now - 3600, now - 7200).unwrap();
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let queue = RecordingQueue::default();

        let result = service(db, &queue).confirm(&expired).await;
        assert!(matches!(result, Err(AppError::InvalidToken(_))));
    }

    #[test]
    fn test_generate_confirmation_url() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let svc = service(db, &RecordingQueue::default());
        let mut u = user(1);
        u.email_confirmation_token = Some("tok".to_string());

        let url = svc
            .generate_confirmation_url(&u, &[("__e_ct_guid", "1"), ("campaign", "global")])
            .unwrap();

        assert_eq!(
            url,
            "https://www.minds.com/email-confirmation?__e_ct_guid=1&campaign=global&__e_cnf_token=tok"
        );
    }
}
