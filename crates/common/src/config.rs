//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Redis configuration.
    pub redis: RedisConfig,
    /// Elasticsearch configuration.
    pub elasticsearch: ElasticsearchConfig,
    /// Email confirmation token settings.
    pub email_confirmation: EmailConfirmationConfig,
    /// Single sign-on settings.
    #[serde(default)]
    pub sso: SsoConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public site URL, with trailing slash.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL.
    pub url: String,
    /// Key prefix for all Redis keys.
    #[serde(default = "default_redis_prefix")]
    pub prefix: String,
}

/// Elasticsearch configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ElasticsearchConfig {
    /// Cluster URL.
    pub url: String,
    /// Main entity index.
    #[serde(default = "default_es_index")]
    pub index: String,
    /// Index pattern holding analytics events.
    #[serde(default = "default_metrics_index")]
    pub metrics_index: String,
    /// Index pattern holding on-chain transactions.
    #[serde(default = "default_transactions_index")]
    pub transactions_index: String,
    /// Scroll cursor keep-alive, e.g. `2m`.
    #[serde(default = "default_scroll_keep_alive")]
    pub scroll_keep_alive: String,
    /// Documents fetched per scroll page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// Email confirmation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfirmationConfig {
    /// HMAC key used to sign confirmation tokens.
    pub signing_key: String,
    /// Token lifetime in seconds.
    #[serde(default = "default_confirmation_expiration")]
    pub expiration: i64,
}

/// Single sign-on configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SsoConfig {
    /// HMAC key used to sign SSO tokens.
    #[serde(default)]
    pub signing_key: String,
    /// Domains that always belong to this site.
    #[serde(default)]
    pub root_domains: Vec<String>,
    /// SSO token lifetime in seconds.
    #[serde(default = "default_sso_ttl")]
    pub token_ttl: i64,
}

impl Default for SsoConfig {
    fn default() -> Self {
        Self {
            signing_key: String::new(),
            root_domains: Vec::new(),
            token_ttl: default_sso_ttl(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

fn default_redis_prefix() -> String {
    "minds".to_string()
}

fn default_es_index() -> String {
    "minds_badger".to_string()
}

fn default_metrics_index() -> String {
    "minds-metrics-*".to_string()
}

fn default_transactions_index() -> String {
    "minds-transactions-onchain*".to_string()
}

fn default_scroll_keep_alive() -> String {
    "2m".to_string()
}

const fn default_page_size() -> u32 {
    500
}

const fn default_confirmation_expiration() -> i64 {
    // 48 hours
    172_800
}

const fn default_sso_ttl() -> i64 {
    60
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `MINDS_ENV`)
    /// 3. Environment variables with `MINDS_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("MINDS_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("MINDS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("MINDS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_optional_sections() {
        let raw = r#"
            [server]
            url = "https://www.minds.com/"

            [database]
            url = "postgres://localhost/minds"

            [redis]
            url = "redis://localhost"

            [elasticsearch]
            url = "http://localhost:9200"

            [email_confirmation]
            signing_key = "secret"
        "#;

        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.elasticsearch.index, "minds_badger");
        assert_eq!(
            config.elasticsearch.transactions_index,
            "minds-transactions-onchain*"
        );
        assert_eq!(config.email_confirmation.expiration, 172_800);
        assert!(config.sso.root_domains.is_empty());
        assert_eq!(config.sso.token_ttl, 60);
    }
}
