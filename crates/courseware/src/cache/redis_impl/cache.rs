//! Redis cache implementation.
//!
//! Every entry is written with `SET .. EX`, so Redis owns expiry and eviction.
//! Connection setup and each command run under their own timeout.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use courseware_core::cache::{Cache, CacheError, CacheStats, Result};

use super::error::map_redis_error;

/// Default bound on connection setup and on each command.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_millis(500);

/// Redis cache backend using a connection manager for reconnects.
pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
    command_timeout: Duration,
}

impl RedisCache {
    /// Connects to Redis and verifies the connection with a `PING`.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., "redis://localhost:6379")
    /// * `command_timeout` - Bound on connection setup and on every command
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the connection cannot be
    /// established in time.
    pub async fn new(url: &str, command_timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = bounded(command_timeout, async {
            redis::aio::ConnectionManager::new(client)
                .await
                .map_err(map_redis_error)
        })
        .await
        .map_err(|err| match err {
            CacheError::Timeout(ms) => {
                CacheError::ConnectionFailed(format!("connect timed out after {}ms", ms))
            }
            other => other,
        })?;

        let cache = Self {
            conn,
            command_timeout,
        };
        cache.ping().await?;
        Ok(cache)
    }
}

/// Runs a Redis call under `limit`.
async fn bounded<T>(limit: Duration, call: impl Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(CacheError::Timeout(
            u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        )),
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        bounded(self.command_timeout, async move {
            conn.get::<_, Option<Vec<u8>>>(key)
                .await
                .map_err(map_redis_error)
        })
        .await
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        // SET EX takes whole seconds; sub-second TTLs round up to one.
        let seconds = ttl.as_secs().max(1);
        bounded(self.command_timeout, async move {
            conn.set_ex::<_, _, ()>(key, value, seconds)
                .await
                .map_err(map_redis_error)
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        bounded(self.command_timeout, async move {
            conn.del::<_, ()>(key).await.map_err(map_redis_error)
        })
        .await
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        bounded(self.command_timeout, async move {
            let _: String = redis::cmd("PING")
                .query_async(&mut conn)
                .await
                .map_err(map_redis_error)?;
            Ok(())
        })
        .await
    }

    async fn stats(&self) -> Result<CacheStats> {
        let mut conn = self.conn.clone();
        bounded(self.command_timeout, async move {
            let info: String = redis::cmd("INFO")
                .arg("memory")
                .arg("stats")
                .query_async(&mut conn)
                .await
                .map_err(map_redis_error)?;
            let keys: u64 = redis::cmd("DBSIZE")
                .query_async(&mut conn)
                .await
                .map_err(map_redis_error)?;
            Ok(CacheStats::new("redis", keys).with_info(info))
        })
        .await
    }
}
