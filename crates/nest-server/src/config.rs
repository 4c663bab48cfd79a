//! Server configuration.
//!
//! Settings come from three layers, later ones winning: built-in
//! defaults, an optional TOML (or JSON) file, then `BOOKNEST_*`
//! environment variables.

use anyhow::{bail, Context, Result};
use nest_auth::{DEFAULT_ACCESS_TTL_MINUTES, DEFAULT_REFRESH_TTL_DAYS};
use nest_commerce::store::StoreSettings;
use nest_commerce::Currency;
use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;

/// Secret used when none is configured. Fine for local runs only.
pub const DEV_JWT_SECRET: &str = "booknest-dev-secret-change-me";

/// Complete server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    /// Pricing settings handed to the store.
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub log: LogConfig,
}

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Address to bind, `host:port`.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:`.
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl DatabaseConfig {
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

/// Token settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: i64,

    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_database_path() -> String {
    "booknest.db".to_string()
}

fn default_jwt_secret() -> String {
    DEV_JWT_SECRET.to_string()
}

fn default_access_ttl() -> i64 {
    DEFAULT_ACCESS_TTL_MINUTES
}

fn default_refresh_ttl() -> i64 {
    DEFAULT_REFRESH_TTL_DAYS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ServerConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Load the file when given, otherwise start from defaults, then apply
    /// the process environment.
    pub fn resolve(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `BOOKNEST_*` overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(bind) = lookup("BOOKNEST_BIND") {
            self.server.bind = bind;
        }
        if let Some(path) = lookup("BOOKNEST_DATABASE") {
            self.database.path = path;
        }
        if let Some(secret) = lookup("BOOKNEST_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(minutes) = lookup("BOOKNEST_ACCESS_TTL_MINUTES") {
            self.auth.access_ttl_minutes = parse_number("BOOKNEST_ACCESS_TTL_MINUTES", &minutes)?;
        }
        if let Some(days) = lookup("BOOKNEST_REFRESH_TTL_DAYS") {
            self.auth.refresh_ttl_days = parse_number("BOOKNEST_REFRESH_TTL_DAYS", &days)?;
        }
        if let Some(code) = lookup("BOOKNEST_CURRENCY") {
            self.store.currency = match Currency::from_code(&code) {
                Some(currency) => currency,
                None => bail!("BOOKNEST_CURRENCY: unknown currency {}", code),
            };
        }
        if let Some(cents) = lookup("BOOKNEST_SHIPPING_COST_CENTS") {
            self.store.shipping_cost_cents = parse_number("BOOKNEST_SHIPPING_COST_CENTS", &cents)?;
        }
        if let Some(level) = lookup("BOOKNEST_LOG_LEVEL") {
            self.log.level = level;
        }
        if let Some(format) = lookup("BOOKNEST_LOG_FORMAT") {
            self.log.format = format
                .parse()
                .with_context(|| format!("BOOKNEST_LOG_FORMAT: {}", format))?;
        }
        Ok(())
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            bail!("auth.jwt_secret must not be empty");
        }
        if self.auth.access_ttl_minutes <= 0 || self.auth.refresh_ttl_days <= 0 {
            bail!("token lifetimes must be positive");
        }
        if self.store.shipping_cost_cents < 0 {
            bail!("store.shipping_cost_cents must not be negative");
        }
        Ok(())
    }

    /// Whether the development secret is still in use.
    pub fn uses_dev_secret(&self) -> bool {
        self.auth.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse_number(key: &str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse()
        .with_context(|| format!("{}: expected an integer, got {:?}", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:8000");
        assert_eq!(config.auth.access_ttl_minutes, 30);
        assert_eq!(config.auth.refresh_ttl_days, 7);
        assert_eq!(config.store.currency, Currency::USD);
        assert_eq!(config.log.format, LogFormat::Json);
        assert!(config.uses_dev_secret());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config: ServerConfig = toml::from_str(
            r#"
            [database]
            path = ":memory:"

            [store]
            shipping_cost_cents = 500

            [log]
            format = "human"
            "#,
        )
        .unwrap();
        assert!(config.database.is_in_memory());
        assert_eq!(config.store.shipping_cost_cents, 500);
        assert_eq!(config.store.currency, Currency::USD);
        assert_eq!(config.log.format, LogFormat::Human);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.server.bind, "127.0.0.1:8000");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("BOOKNEST_BIND", "0.0.0.0:9000"),
            ("BOOKNEST_JWT_SECRET", "s3cret"),
            ("BOOKNEST_CURRENCY", "UZS"),
            ("BOOKNEST_ACCESS_TTL_MINUTES", "15"),
        ]
        .into_iter()
        .collect();

        let mut config = ServerConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.store.currency, Currency::UZS);
        assert_eq!(config.auth.access_ttl_minutes, 15);
        assert!(!config.uses_dev_secret());
    }

    #[test]
    fn test_bad_env_value() {
        let mut config = ServerConfig::default();
        let result = config.apply_env(|key| {
            (key == "BOOKNEST_SHIPPING_COST_CENTS").then(|| "a lot".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_empty_secret() {
        let mut config = ServerConfig::default();
        config.auth.jwt_secret = "  ".into();
        assert!(config.validate().is_err());
    }
}
