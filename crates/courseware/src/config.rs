use std::{env, str::FromStr, time::Duration};

use thiserror::Error;

use courseware_core::cache::{TtlPolicy, DEFAULT_OPERATION_TIMEOUT};

use crate::services::AdminCredentials;

/// Secret used when `JWT_SECRET` is unset. Fine for local runs only.
pub const DEV_JWT_SECRET: &str = "courseware-dev-secret-change-me";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Entity TTL in seconds (default: 900)
    pub cache_entity_ttl_seconds: u64,
    /// Course list TTL in seconds (default: 300)
    pub cache_list_ttl_seconds: u64,
    /// Bound on each cache call in milliseconds (default: 250)
    pub cache_timeout_ms: u64,
    /// Maximum number of in-memory cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Path to SQLite database file (default: "courseware.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    pub jwt_secret: String,
    /// Token lifetime in hours (default: 24)
    pub jwt_ttl_hours: u64,
    pub admin_username: String,
    pub admin_password: String,
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn string(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_ENTITY_TTL_SECONDS` - Course TTL in seconds (default: 900)
    /// - `CACHE_LIST_TTL_SECONDS` - Course list TTL in seconds (default: 300)
    /// - `CACHE_TIMEOUT_MS` - Bound on each cache call (default: 250)
    /// - `CACHE_MAX_ENTRIES` - Maximum in-memory cache entries (default: 10,000)
    /// - `SQLITE_PATH` - SQLite database path (default: "courseware.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `JWT_SECRET` - Token signing secret (default: a development secret)
    /// - `JWT_TTL_HOURS` - Token lifetime (default: 24)
    /// - `ADMIN_USERNAME` / `ADMIN_PASSWORD` - Admin login (default: "admin" / "admin!dev")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Unparseable
    /// values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            cache_entity_ttl_seconds: parsed(&lookup, "CACHE_ENTITY_TTL_SECONDS", 900),
            cache_list_ttl_seconds: parsed(&lookup, "CACHE_LIST_TTL_SECONDS", 300),
            cache_timeout_ms: parsed(
                &lookup,
                "CACHE_TIMEOUT_MS",
                DEFAULT_OPERATION_TIMEOUT.as_millis() as u64,
            ),
            cache_max_entries: parsed(&lookup, "CACHE_MAX_ENTRIES", 10_000),
            sqlite_path: string(&lookup, "SQLITE_PATH", "courseware.db"),
            redis_url: string(&lookup, "REDIS_URL", "redis://localhost:6379"),
            jwt_secret: string(&lookup, "JWT_SECRET", DEV_JWT_SECRET),
            jwt_ttl_hours: parsed(&lookup, "JWT_TTL_HOURS", 24),
            admin_username: string(&lookup, "ADMIN_USERNAME", "admin"),
            admin_password: string(&lookup, "ADMIN_PASSWORD", "admin!dev"),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("CACHE_ENTITY_TTL_SECONDS", self.cache_entity_ttl_seconds),
            ("CACHE_LIST_TTL_SECONDS", self.cache_list_ttl_seconds),
            ("CACHE_TIMEOUT_MS", self.cache_timeout_ms),
            ("CACHE_MAX_ENTRIES", self.cache_max_entries as u64),
            ("JWT_TTL_HOURS", self.jwt_ttl_hours),
        ];
        if let Some((key, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Zero(key));
        }

        let non_empty = [
            ("JWT_SECRET", &self.jwt_secret),
            ("ADMIN_USERNAME", &self.admin_username),
            ("ADMIN_PASSWORD", &self.admin_password),
        ];
        if let Some((key, _)) = non_empty.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::Empty(key));
        }

        Ok(())
    }

    /// TTLs for the cache-aside layer. Call after [`Config::validate`].
    pub fn ttl_policy(&self) -> TtlPolicy {
        TtlPolicy::new(
            Duration::from_secs(self.cache_entity_ttl_seconds),
            Duration::from_secs(self.cache_list_ttl_seconds),
        )
    }

    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }

    pub fn jwt_ttl(&self) -> Duration {
        Duration::from_secs(self.jwt_ttl_hours * 60 * 60)
    }

    pub fn admin_credentials(&self) -> AdminCredentials {
        AdminCredentials {
            username: self.admin_username.clone(),
            password: self.admin_password.clone(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("cache_entity_ttl_seconds", &self.cache_entity_ttl_seconds)
            .field("cache_list_ttl_seconds", &self.cache_list_ttl_seconds)
            .field("cache_timeout_ms", &self.cache_timeout_ms)
            .field("cache_max_entries", &self.cache_max_entries)
            .field("sqlite_path", &self.sqlite_path)
            .field("redis_url", &self.redis_url)
            .field("jwt_ttl_hours", &self.jwt_ttl_hours)
            .field("admin_username", &self.admin_username)
            .finish_non_exhaustive()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
