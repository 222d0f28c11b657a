//! Application state.
//!
//! Holds the services shared by every request handler. The storage and cache
//! backends are picked by cargo feature: `sqlite` swaps the in-memory
//! repository for SQLite and `redis` swaps the in-memory LRU cache for Redis.

use std::sync::Arc;

use axum::extract::FromRef;

use courseware_core::cache::{Cache, CacheAside, COURSE_KIND, COURSE_LIST_TAG};
use courseware_core::storage::{CourseRepository, EnrollmentRepository};

use crate::auth::{AuthState, JwtAuthenticator};
use crate::cache::MemoryCache;
use crate::config::Config;
use crate::services::{AuthService, CatalogService, EnrollmentService};
use crate::storage::InMemoryRepository;

/// Whether a real cache backend is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    Enabled,
    /// The backend could not be reached at startup; every read is a miss.
    Disabled,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub enrollments: Arc<EnrollmentService>,
    pub auth: Arc<AuthService>,
    pub auth_state: AuthState,
    pub cache_mode: CacheMode,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth_state.clone()
    }
}

impl AppState {
    fn build(
        courses: Arc<dyn CourseRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
        cache: Arc<dyn Cache>,
        cache_mode: CacheMode,
        config: &Config,
    ) -> Self {
        let aside = CacheAside::new(cache, COURSE_KIND, config.ttl_policy())
            .with_list_tag(COURSE_LIST_TAG)
            .with_timeout(config.cache_timeout());

        let authenticator = Arc::new(JwtAuthenticator::new(
            &config.jwt_secret,
            config.jwt_ttl(),
        ));

        Self {
            catalog: Arc::new(CatalogService::new(
                courses.clone(),
                enrollments.clone(),
                aside,
            )),
            enrollments: Arc::new(EnrollmentService::new(courses, enrollments)),
            auth: Arc::new(AuthService::new(
                authenticator.clone(),
                config.admin_credentials(),
            )),
            auth_state: AuthState { authenticator },
            cache_mode,
        }
    }

    /// Creates the state with the backends selected by cargo features.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let (cache, cache_mode) = Self::connect_cache(config).await;

        #[cfg(feature = "sqlite")]
        let repo = {
            let repo = crate::storage::SqliteRepository::new(&config.sqlite_path).await?;
            tracing::info!(path = %config.sqlite_path, "Using SQLite storage");
            Arc::new(repo)
        };

        #[cfg(not(feature = "sqlite"))]
        let repo = {
            tracing::info!("Using in-memory storage");
            Arc::new(InMemoryRepository::new())
        };

        Ok(Self::build(
            repo.clone(),
            repo,
            cache,
            cache_mode,
            config,
        ))
    }

    /// In-memory storage in front of the given cache backend.
    pub(crate) fn in_memory(
        cache: Arc<dyn Cache>,
        cache_mode: CacheMode,
        config: &Config,
    ) -> Self {
        let repo = Arc::new(InMemoryRepository::new());
        Self::build(repo.clone(), repo, cache, cache_mode, config)
    }

    #[cfg(feature = "redis")]
    async fn connect_cache(config: &Config) -> (Arc<dyn Cache>, CacheMode) {
        use crate::cache::{DisabledCache, RedisCache, DEFAULT_COMMAND_TIMEOUT};

        match RedisCache::new(&config.redis_url, DEFAULT_COMMAND_TIMEOUT).await {
            Ok(cache) => {
                tracing::info!(url = %config.redis_url, "Using Redis cache");
                (Arc::new(cache), CacheMode::Enabled)
            }
            Err(err) => {
                tracing::warn!(
                    url = %config.redis_url,
                    error = %err,
                    "Redis unavailable, caching disabled"
                );
                (Arc::new(DisabledCache), CacheMode::Disabled)
            }
        }
    }

    #[cfg(not(feature = "redis"))]
    async fn connect_cache(config: &Config) -> (Arc<dyn Cache>, CacheMode) {
        tracing::info!(
            max_entries = config.cache_max_entries,
            "Using in-memory cache"
        );
        (
            Arc::new(MemoryCache::new(config.cache_max_entries)),
            CacheMode::Enabled,
        )
    }
}

impl Default for AppState {
    /// In-memory storage and cache with default configuration.
    fn default() -> Self {
        let config = Config::default();
        Self::in_memory(
            Arc::new(MemoryCache::new(config.cache_max_entries)),
            CacheMode::Enabled,
            &config,
        )
    }
}
