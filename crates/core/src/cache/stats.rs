use serde::Serialize;

/// Point-in-time statistics reported by a cache backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Backend name, e.g. `memory` or `redis`.
    pub backend: &'static str,
    /// Number of keys currently held.
    pub entries: u64,
    /// Maximum number of keys, for bounded backends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u64>,
    /// Raw backend report (Redis `INFO` output).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl CacheStats {
    pub fn new(backend: &'static str, entries: u64) -> Self {
        Self {
            backend,
            entries,
            capacity: None,
            info: None,
        }
    }

    pub fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }
}
