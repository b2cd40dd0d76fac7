//! Single sign-on across the main site and Pro custom domains.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use minds_common::{AppError, AppResult, Config, Jwt};
use minds_db::{entities::user, repositories::UserRepository};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Domain ownership lookups.
#[async_trait]
pub trait ProDomain: Send + Sync {
    /// Whether the domain is one of the site's own domains.
    fn is_root(&self, domain: &str) -> bool;

    /// The Pro channel serving a custom domain.
    async fn lookup(&self, domain: &str) -> AppResult<Option<user::Model>>;
}

/// Shared domain lookup handle.
pub type ProDomainHandle = Arc<dyn ProDomain>;

/// Root domains from configuration, custom domains from the user table.
#[derive(Clone)]
pub struct ProDomainService {
    root_domains: Vec<String>,
    user_repo: UserRepository,
}

impl ProDomainService {
    #[must_use]
    pub fn new(root_domains: Vec<String>, user_repo: UserRepository) -> Self {
        Self {
            root_domains: root_domains.into_iter().map(|d| d.to_lowercase()).collect(),
            user_repo,
        }
    }
}

#[async_trait]
impl ProDomain for ProDomainService {
    fn is_root(&self, domain: &str) -> bool {
        let domain = domain.to_lowercase();
        self.root_domains.iter().any(|d| *d == domain)
    }

    async fn lookup(&self, domain: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_pro_domain(domain).await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SsoClaims {
    user_guid: String,
    domain: String,
}

/// Issues short-lived tokens that carry a session to another domain.
#[derive(Clone)]
pub struct SsoService {
    domains: ProDomainHandle,
    jwt: Jwt,
    ttl: i64,
}

impl SsoService {
    #[must_use]
    pub fn new(domains: ProDomainHandle, config: &Config) -> Self {
        Self {
            domains,
            jwt: Jwt::new(config.sso.signing_key.clone()),
            ttl: config.sso.token_ttl,
        }
    }

    /// Root domains and registered Pro domains are allowed.
    pub async fn is_allowed(&self, domain: &str) -> AppResult<bool> {
        if self.domains.is_root(domain) {
            return Ok(true);
        }
        Ok(self.domains.lookup(domain).await?.is_some())
    }

    /// Token for `domain`, or `None` when the domain is not allowed.
    pub async fn generate_token(&self, user: &user::Model, domain: &str) -> AppResult<Option<String>> {
        if !self.is_allowed(domain).await? {
            debug!(domain, "SSO requested for unknown domain");
            return Ok(None);
        }

        let now = Utc::now().timestamp();
        let claims = SsoClaims {
            user_guid: user.guid.to_string(),
            domain: domain.to_lowercase(),
        };
        self.jwt.encode(claims, now + self.ttl, now).map(Some)
    }

    /// Guid of the user a token was issued to, if it was issued for `domain`.
    pub fn authorize(&self, token: &str, domain: &str) -> AppResult<i64> {
        let claims: SsoClaims = self.jwt.decode(token)?;
        if claims.domain != domain.to_lowercase() {
            return Err(AppError::InvalidToken("Domain mismatch".to_string()));
        }
        claims
            .user_guid
            .parse()
            .map_err(|_| AppError::InvalidToken("Invalid user".to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_fixtures::user;
    use minds_common::config::SsoConfig;

    struct FixedDomains;

    #[async_trait]
    impl ProDomain for FixedDomains {
        fn is_root(&self, domain: &str) -> bool {
            domain == "www.minds.com"
        }

        async fn lookup(&self, domain: &str) -> AppResult<Option<user::Model>> {
            Ok((domain == "pro.example.com").then(|| user(9)))
        }
    }

    fn sso() -> SsoService {
        SsoService {
            domains: Arc::new(FixedDomains),
            jwt: Jwt::new("sso-secret"),
            ttl: SsoConfig::default().token_ttl,
        }
    }

    #[tokio::test]
    async fn test_is_allowed() {
        let sso = sso();
        assert!(sso.is_allowed("www.minds.com").await.unwrap());
        assert!(sso.is_allowed("pro.example.com").await.unwrap());
        assert!(!sso.is_allowed("evil.example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_token_round_trip() {
        let sso = sso();
        let token = sso.generate_token(&user(1), "pro.example.com").await.unwrap().unwrap();

        assert_eq!(sso.authorize(&token, "pro.example.com").unwrap(), 1);
        assert!(sso.authorize(&token, "other.example.com").is_err());
    }

    #[tokio::test]
    async fn test_no_token_for_unknown_domain() {
        assert!(sso().generate_token(&user(1), "evil.example.com").await.unwrap().is_none());
    }

    #[test]
    fn test_root_domains_are_case_insensitive() {
        let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres).into_connection();
        let domains = ProDomainService::new(
            vec!["WWW.Minds.com".to_string()],
            UserRepository::new(Arc::new(db)),
        );

        assert!(domains.is_root("www.minds.COM"));
        assert!(!domains.is_root("minds.com"));
    }
}
