use std::time::Duration;

use async_trait::async_trait;

use super::stats::CacheStats;
use super::{CacheError, Result};

/// Keyed byte store with per-key expiry.
///
/// Implementations own eviction and expiry. `ttl` is always finite: nothing
/// written through the cache-aside layer can live forever.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key. An absent or expired key is `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache, replacing any previous value.
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    /// Deletes a value from the cache by key. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Checks that the backend is reachable. Used for health reporting only.
    async fn ping(&self) -> Result<()>;

    /// Reports backend statistics. Backends without any return `Unsupported`.
    async fn stats(&self) -> Result<CacheStats> {
        Err(CacheError::Unsupported("stats".to_string()))
    }
}
