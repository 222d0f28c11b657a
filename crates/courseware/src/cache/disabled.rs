//! Backend used when the configured cache cannot be reached at startup.

use std::time::Duration;

use async_trait::async_trait;

use courseware_core::cache::{Cache, CacheError, CacheStats, Result};

/// Cache that never stores anything: reads miss, writes are no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCache;

#[async_trait]
impl Cache for DisabledCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Err(CacheError::ConnectionFailed("cache disabled".to_string()))
    }

    async fn stats(&self) -> Result<CacheStats> {
        Err(CacheError::ConnectionFailed("cache disabled".to_string()))
    }
}
