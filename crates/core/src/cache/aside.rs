//! Cache-aside (look-aside) layer.
//!
//! Reads go `get` -> decode, and the caller falls back to the source of truth
//! on `None`. Writes happen at the source of truth first, then the caller
//! invalidates. Every backend failure, timeout or decode error is absorbed
//! here and turned into a miss or a no-op, so callers never see the cache
//! fail.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use tracing::{trace, warn};

use super::error::{CacheError, Result};
use super::keys::{entity_key, list_key};
use super::serialization::{Codec, JsonCodec};
use super::stats::CacheStats;
use super::traits::Cache;
use super::ttl::TtlPolicy;

/// Upper bound on any single backend call made by the layer.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_millis(250);

/// Get-or-populate and invalidation primitives for one entity kind.
///
/// The layer holds only immutable configuration and a shared handle to the
/// backend, so it can be shared freely between tasks.
pub struct CacheAside<T, K = JsonCodec> {
    cache: Arc<dyn Cache>,
    codec: K,
    kind: String,
    list_tags: Vec<String>,
    ttl: TtlPolicy,
    timeout: Duration,
    _marker: PhantomData<fn() -> T>,
}

impl<T> CacheAside<T, JsonCodec>
where
    JsonCodec: Codec<T>,
{
    /// Creates a layer for entities of `kind`, encoded as JSON.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is empty.
    pub fn new(cache: Arc<dyn Cache>, kind: impl Into<String>, ttl: TtlPolicy) -> Self {
        let kind = kind.into();
        assert!(!kind.is_empty(), "cache entity kind must not be empty");
        Self {
            cache,
            codec: JsonCodec,
            kind,
            list_tags: Vec::new(),
            ttl,
            timeout: DEFAULT_OPERATION_TIMEOUT,
            _marker: PhantomData,
        }
    }
}

impl<T, K> CacheAside<T, K>
where
    K: Codec<T>,
{
    /// Registers a list tag. Only registered tags may be read, written, or
    /// invalidated through this layer.
    ///
    /// # Panics
    ///
    /// Panics if `tag` is empty or equal to the entity kind.
    pub fn with_list_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        assert!(!tag.is_empty(), "cache list tag must not be empty");
        assert_ne!(
            tag, self.kind,
            "cache list tag must differ from the entity kind"
        );
        if !self.list_tags.contains(&tag) {
            self.list_tags.push(tag);
        }
        self
    }

    /// Overrides the per-operation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Swaps the codec used to encode values.
    pub fn with_codec<C: Codec<T>>(self, codec: C) -> CacheAside<T, C> {
        CacheAside {
            cache: self.cache,
            codec,
            kind: self.kind,
            list_tags: self.list_tags,
            ttl: self.ttl,
            timeout: self.timeout,
            _marker: PhantomData,
        }
    }

    pub fn ttl(&self) -> TtlPolicy {
        self.ttl
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Looks up a single entity. Any failure is reported as a miss.
    pub async fn get_entity(&self, id: &str) -> Option<T> {
        let key = entity_key(&self.kind, id);
        let Some(bytes) = self.guarded("get", &key, self.cache.get(&key)).await.flatten() else {
            trace!(key = %key, "Cache miss");
            return None;
        };

        match self.codec.decode(&bytes) {
            Ok(value) => {
                trace!(key = %key, "Cache hit");
                Some(value)
            }
            Err(err) => {
                warn!(key = %key, error = %err, "Failed to decode cached entity, treating as miss");
                None
            }
        }
    }

    /// Stores a single entity with the entity TTL. Failures are logged and dropped.
    pub async fn put_entity(&self, id: &str, value: &T) {
        let key = entity_key(&self.kind, id);
        let bytes = match self.codec.encode(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(key = %key, error = %err, "Failed to encode entity for cache");
                return;
            }
        };

        self.guarded("set", &key, self.cache.set(&key, &bytes, self.ttl.entity()))
            .await;
    }

    /// Looks up the snapshot stored under a registered list tag.
    ///
    /// # Panics
    ///
    /// Panics if `tag` was never registered with [`CacheAside::with_list_tag`].
    pub async fn get_list(&self, tag: &str) -> Option<Vec<T>> {
        let key = self.registered_list_key(tag);
        let Some(bytes) = self.guarded("get", &key, self.cache.get(&key)).await.flatten() else {
            trace!(key = %key, "Cache miss");
            return None;
        };

        match self.codec.decode_list(&bytes) {
            Ok(values) => {
                trace!(key = %key, count = values.len(), "Cache hit");
                Some(values)
            }
            Err(err) => {
                warn!(key = %key, error = %err, "Failed to decode cached list, treating as miss");
                None
            }
        }
    }

    /// Stores a list snapshot with the list TTL. Failures are logged and dropped.
    ///
    /// # Panics
    ///
    /// Panics if `tag` was never registered.
    pub async fn put_list(&self, tag: &str, values: &[T]) {
        let key = self.registered_list_key(tag);
        let bytes = match self.codec.encode_list(values) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(key = %key, error = %err, "Failed to encode list for cache");
                return;
            }
        };

        self.guarded("set", &key, self.cache.set(&key, &bytes, self.ttl.list()))
            .await;
    }

    /// Drops the entry for one entity.
    pub async fn invalidate_entity(&self, id: &str) {
        let key = entity_key(&self.kind, id);
        self.guarded("delete", &key, self.cache.delete(&key)).await;
    }

    /// Drops the snapshot of every registered list tag.
    pub async fn invalidate_all_lists(&self) {
        for tag in &self.list_tags {
            let key = list_key(tag);
            self.guarded("delete", &key, self.cache.delete(&key)).await;
        }
    }

    /// Pings the backend within the operation timeout.
    ///
    /// Unlike the other operations this reports the failure.
    pub async fn probe(&self) -> Result<()> {
        match tokio::time::timeout(self.timeout, self.cache.ping()).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(self.timeout_ms())),
        }
    }

    /// Backend statistics within the operation timeout. Failures are reported.
    pub async fn stats(&self) -> Result<CacheStats> {
        match tokio::time::timeout(self.timeout, self.cache.stats()).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(self.timeout_ms())),
        }
    }

    fn registered_list_key(&self, tag: &str) -> String {
        assert!(
            self.list_tags.iter().any(|t| t == tag),
            "list tag `{}` is not registered with the `{}` cache layer",
            tag,
            self.kind
        );
        list_key(tag)
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Runs a backend call under the operation timeout, absorbing any failure.
    async fn guarded<R>(
        &self,
        op: &'static str,
        key: &str,
        call: impl Future<Output = Result<R>>,
    ) -> Option<R> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(err)) => {
                warn!(op, key = %key, error = %err, "Cache operation failed, continuing without cache");
                None
            }
            Err(_) => {
                warn!(
                    op,
                    key = %key,
                    timeout_ms = self.timeout_ms(),
                    "Cache operation timed out, continuing without cache"
                );
                None
            }
        }
    }
}

impl<T, K> fmt::Debug for CacheAside<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheAside")
            .field("kind", &self.kind)
            .field("list_tags", &self.list_tags)
            .field("ttl", &self.ttl)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use super::*;
    use crate::cache::{course_key, course_list_key, COURSE_KIND, COURSE_LIST_TAG};
    use crate::course::{Course, Difficulty};

    /// In-memory backend with real per-key expiry on the tokio clock.
    #[derive(Default)]
    struct MockCache {
        store: Mutex<HashMap<String, (Vec<u8>, Instant)>>,
        set_ttls: Mutex<Vec<(String, Duration)>>,
        deletes: AtomicUsize,
    }

    impl MockCache {
        fn raw_insert(&self, key: &str, value: &[u8]) {
            self.store.lock().unwrap().insert(
                key.to_string(),
                (value.to_vec(), Instant::now() + Duration::from_secs(60)),
            );
        }

        fn contains(&self, key: &str) -> bool {
            self.store.lock().unwrap().contains_key(key)
        }

        fn ttl_for(&self, key: &str) -> Option<Duration> {
            self.set_ttls
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, ttl)| *ttl)
        }
    }

    #[async_trait]
    impl Cache for MockCache {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            let mut store = self.store.lock().unwrap();
            match store.get(key) {
                Some((_, expires_at)) if Instant::now() >= *expires_at => {
                    store.remove(key);
                    Ok(None)
                }
                Some((value, _)) => Ok(Some(value.clone())),
                None => Ok(None),
            }
        }

        async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
            self.set_ttls.lock().unwrap().push((key.to_string(), ttl));
            self.store
                .lock()
                .unwrap()
                .insert(key.to_string(), (value.to_vec(), Instant::now() + ttl));
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.store.lock().unwrap().remove(key);
            Ok(())
        }

        async fn ping(&self) -> Result<()> {
            Ok(())
        }
    }

    /// Backend that is never reachable.
    struct FailingCache;

    #[async_trait]
    impl Cache for FailingCache {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Err(CacheError::ConnectionFailed("connection refused".to_string()))
        }

        async fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) -> Result<()> {
            Err(CacheError::ConnectionFailed("connection refused".to_string()))
        }

        async fn delete(&self, _key: &str) -> Result<()> {
            Err(CacheError::OperationFailed("READONLY".to_string()))
        }

        async fn ping(&self) -> Result<()> {
            Err(CacheError::ConnectionFailed("connection refused".to_string()))
        }
    }

    /// Backend that hangs far longer than any sane timeout.
    struct SlowCache;

    #[async_trait]
    impl Cache for SlowCache {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) -> Result<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }

        async fn delete(&self, _key: &str) -> Result<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }

        async fn ping(&self) -> Result<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
    }

    fn layer(cache: Arc<dyn Cache>) -> CacheAside<Course> {
        CacheAside::new(cache, COURSE_KIND, TtlPolicy::default()).with_list_tag(COURSE_LIST_TAG)
    }

    fn test_course(title: &str) -> Course {
        Course::new(title, "A course about things", Difficulty::Intermediate)
    }

    #[tokio::test]
    async fn test_get_entity_miss_on_empty_cache() {
        let aside = layer(Arc::new(MockCache::default()));
        assert!(aside.get_entity("42").await.is_none());
    }

    #[tokio::test]
    async fn test_put_then_get_entity() {
        let cache = Arc::new(MockCache::default());
        let aside = layer(cache.clone());
        let course = test_course("Networking 101");
        let id = course.id.to_string();

        aside.put_entity(&id, &course).await;

        assert!(cache.contains(&course_key(course.id)));
        assert_eq!(aside.get_entity(&id).await, Some(course));
    }

    #[tokio::test]
    async fn test_invalidate_entity_then_miss() {
        let aside = layer(Arc::new(MockCache::default()));
        let course = test_course("Networking 101");
        let id = course.id.to_string();

        aside.put_entity(&id, &course).await;
        aside.invalidate_entity(&id).await;

        assert!(aside.get_entity(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_absent_entity_is_noop() {
        let aside = layer(Arc::new(MockCache::default()));
        aside.invalidate_entity("missing").await;
        assert!(aside.get_entity("missing").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entity_entry_expires_after_entity_ttl() {
        let cache = Arc::new(MockCache::default());
        let aside = layer(cache.clone());
        let course = test_course("Databases");
        let id = course.id.to_string();

        aside.put_entity(&id, &course).await;
        assert_eq!(
            cache.ttl_for(&course_key(course.id)),
            Some(Duration::from_secs(900))
        );

        tokio::time::advance(Duration::from_secs(899)).await;
        assert_eq!(aside.get_entity(&id).await, Some(course.clone()));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(aside.get_entity(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_list_uses_list_ttl() {
        let cache = Arc::new(MockCache::default());
        let aside = layer(cache.clone());
        let courses = vec![test_course("A"), test_course("B")];

        aside.put_list(COURSE_LIST_TAG, &courses).await;

        assert_eq!(
            cache.ttl_for(&course_list_key()),
            Some(Duration::from_secs(300))
        );
        assert_eq!(aside.get_list(COURSE_LIST_TAG).await, Some(courses));
    }

    #[tokio::test]
    async fn test_empty_list_is_a_hit() {
        let aside = layer(Arc::new(MockCache::default()));

        aside.put_list(COURSE_LIST_TAG, &[]).await;

        assert_eq!(aside.get_list(COURSE_LIST_TAG).await, Some(vec![]));
    }

    #[tokio::test]
    async fn test_invalidate_all_lists_keeps_entities() {
        let cache = Arc::new(MockCache::default());
        let aside = layer(cache.clone());
        let course = test_course("Compilers");
        let id = course.id.to_string();

        aside.put_entity(&id, &course).await;
        aside
            .put_list(COURSE_LIST_TAG, std::slice::from_ref(&course))
            .await;

        aside.invalidate_all_lists().await;

        assert!(aside.get_list(COURSE_LIST_TAG).await.is_none());
        assert_eq!(aside.get_entity(&id).await, Some(course));
    }

    #[tokio::test]
    async fn test_invalidate_all_lists_deletes_every_tag() {
        let cache = Arc::new(MockCache::default());
        let aside = layer(cache.clone()).with_list_tag("course-featured");

        aside.put_list(COURSE_LIST_TAG, &[test_course("A")]).await;
        aside.put_list("course-featured", &[test_course("B")]).await;
        aside.invalidate_all_lists().await;

        assert_eq!(cache.deletes.load(Ordering::SeqCst), 2);
        assert!(aside.get_list(COURSE_LIST_TAG).await.is_none());
        assert!(aside.get_list("course-featured").await.is_none());
    }

    #[tokio::test]
    async fn test_failing_backend_degrades_to_miss() {
        let aside = layer(Arc::new(FailingCache));
        let course = test_course("Distributed Systems");
        let id = course.id.to_string();

        aside.put_entity(&id, &course).await;
        aside.put_list(COURSE_LIST_TAG, &[course.clone()]).await;
        aside.invalidate_entity(&id).await;
        aside.invalidate_all_lists().await;

        assert!(aside.get_entity(&id).await.is_none());
        assert!(aside.get_list(COURSE_LIST_TAG).await.is_none());
        assert!(aside.probe().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_backend_times_out() {
        let aside = layer(Arc::new(SlowCache));
        let course = test_course("Operating Systems");
        let id = course.id.to_string();

        let started = Instant::now();
        assert!(aside.get_entity(&id).await.is_none());
        aside.put_entity(&id, &course).await;
        aside.invalidate_all_lists().await;

        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(aside.probe().await, Err(CacheError::Timeout(250)));
    }

    #[tokio::test]
    async fn test_decode_failure_is_miss_then_overwritten() {
        let cache = Arc::new(MockCache::default());
        let aside = layer(cache.clone());
        let course = test_course("Cryptography");
        let id = course.id.to_string();

        cache.raw_insert(&course_key(course.id), b"{not json");
        assert!(aside.get_entity(&id).await.is_none());
        assert!(cache.contains(&course_key(course.id)));

        aside.put_entity(&id, &course).await;
        assert_eq!(aside.get_entity(&id).await, Some(course));
    }

    #[tokio::test]
    async fn test_list_decode_failure_is_miss_then_overwritten() {
        let cache = Arc::new(MockCache::default());
        let aside = layer(cache.clone());
        let courses = vec![test_course("Compilers"), test_course("Databases")];

        cache.raw_insert(&course_list_key(), b"[{\"id\":");
        assert!(aside.get_list(COURSE_LIST_TAG).await.is_none());
        assert!(cache.contains(&course_list_key()));

        aside.put_list(COURSE_LIST_TAG, &courses).await;
        assert_eq!(aside.get_list(COURSE_LIST_TAG).await, Some(courses));
    }

    #[tokio::test]
    async fn test_stats_default_is_unsupported() {
        let aside = layer(Arc::new(MockCache::default()));
        assert!(matches!(
            aside.stats().await,
            Err(CacheError::Unsupported(_))
        ));
    }

    #[tokio::test]
    async fn test_stats_reports_backend_failure() {
        let aside = layer(Arc::new(FailingCache));
        assert!(matches!(
            aside.stats().await,
            Err(CacheError::ConnectionFailed(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stats_times_out_on_slow_backend() {
        let aside = layer(Arc::new(SlowCache)).with_timeout(Duration::from_millis(50));
        assert!(matches!(aside.stats().await, Err(CacheError::Timeout(50))));
    }

    #[tokio::test]
    async fn test_concurrent_populates_converge() {
        let aside = Arc::new(layer(Arc::new(MockCache::default())));
        let course = test_course("Concurrency");
        let id = course.id.to_string();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let aside = aside.clone();
                let course = course.clone();
                let id = id.clone();
                tokio::spawn(async move { aside.put_entity(&id, &course).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(aside.get_entity(&id).await, Some(course));
    }

    #[tokio::test]
    #[should_panic(expected = "is not registered")]
    async fn test_unregistered_list_tag_panics() {
        let aside = layer(Arc::new(MockCache::default()));
        aside.get_list("student-list").await;
    }

    #[tokio::test]
    #[should_panic(expected = "id must not be empty")]
    async fn test_empty_entity_id_panics() {
        let aside = layer(Arc::new(MockCache::default()));
        aside.get_entity("").await;
    }

    #[test]
    #[should_panic(expected = "must differ from the entity kind")]
    fn test_list_tag_equal_to_kind_panics() {
        let _ = layer(Arc::new(MockCache::default())).with_list_tag(COURSE_KIND);
    }

    #[test]
    fn test_builder_overrides() {
        let aside = layer(Arc::new(MockCache::default())).with_timeout(Duration::from_millis(50));
        assert_eq!(aside.timeout(), Duration::from_millis(50));
        assert_eq!(aside.ttl(), TtlPolicy::default());
    }
}
