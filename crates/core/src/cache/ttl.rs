use std::time::Duration;

/// Default lifetime of a single-entity entry (15 minutes).
pub const DEFAULT_ENTITY_TTL: Duration = Duration::from_secs(900);

/// Default lifetime of a list snapshot (5 minutes).
pub const DEFAULT_LIST_TTL: Duration = Duration::from_secs(300);

/// Lifetimes applied to entries written through the cache-aside layer.
///
/// Both durations are strictly positive. Lists get the shorter lifetime since
/// any write to the collection makes them stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    entity: Duration,
    list: Duration,
}

impl TtlPolicy {
    /// Creates a policy from explicit lifetimes.
    ///
    /// # Panics
    ///
    /// Panics if either duration is zero. Configuration rejects zero values
    /// before a policy is ever built.
    pub fn new(entity: Duration, list: Duration) -> Self {
        assert!(!entity.is_zero(), "entity TTL must be > 0");
        assert!(!list.is_zero(), "list TTL must be > 0");
        Self { entity, list }
    }

    pub fn entity(&self) -> Duration {
        self.entity
    }

    pub fn list(&self) -> Duration {
        self.list
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ENTITY_TTL, DEFAULT_LIST_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = TtlPolicy::default();
        assert_eq!(policy.entity(), Duration::from_secs(900));
        assert_eq!(policy.list(), Duration::from_secs(300));
    }

    #[test]
    #[should_panic(expected = "entity TTL must be > 0")]
    fn test_zero_entity_ttl_panics() {
        TtlPolicy::new(Duration::ZERO, DEFAULT_LIST_TTL);
    }

    #[test]
    #[should_panic(expected = "list TTL must be > 0")]
    fn test_zero_list_ttl_panics() {
        TtlPolicy::new(DEFAULT_ENTITY_TTL, Duration::ZERO);
    }
}
