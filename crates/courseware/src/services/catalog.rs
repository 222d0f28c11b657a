//! Course catalog service.
//!
//! Reads of single courses and of the full catalog go through the
//! cache-aside layer; every write goes to the repository first and then
//! invalidates. Paginated search and the per-course student views always hit
//! the repository.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use courseware_core::cache::{CacheAside, CacheError, CacheStats, COURSE_LIST_TAG};
use courseware_core::course::{validate_course_request, validate_email, Course, CourseRequest};
use courseware_core::storage::{
    CoursePage, CourseQuery, CourseRepository, EnrollmentRepository, PaginationMeta,
    RepositoryError,
};

use super::error::Result;

pub struct CatalogService {
    courses: Arc<dyn CourseRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
    cache: CacheAside<Course>,
}

impl CatalogService {
    /// Creates a catalog service.
    ///
    /// # Panics
    ///
    /// The cache layer must have [`COURSE_LIST_TAG`] registered; the first
    /// catalog read panics otherwise.
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
        cache: CacheAside<Course>,
    ) -> Self {
        Self {
            courses,
            enrollments,
            cache,
        }
    }

    /// Every course, newest first.
    pub async fn list_courses(&self) -> Result<Vec<Course>> {
        if let Some(courses) = self.cache.get_list(COURSE_LIST_TAG).await {
            return Ok(courses);
        }

        let courses = self.courses.list_courses().await?;
        self.cache.put_list(COURSE_LIST_TAG, &courses).await;
        Ok(courses)
    }

    pub async fn get_course(&self, id: Uuid) -> Result<Course> {
        let key = id.to_string();
        if let Some(course) = self.cache.get_entity(&key).await {
            return Ok(course);
        }

        let course = self
            .courses
            .get_course(id)
            .await?
            .ok_or_else(|| RepositoryError::course_not_found(id))?;
        self.cache.put_entity(&key, &course).await;
        Ok(course)
    }

    pub async fn create_course(&self, request: CourseRequest) -> Result<Course> {
        validate_course_request(&request)?;

        let course = request.into_course();
        self.courses.create_course(&course).await?;
        self.cache.invalidate_all_lists().await;

        info!(course_id = %course.id, title = %course.title, "Course created");
        Ok(course)
    }

    pub async fn update_course(&self, id: Uuid, request: CourseRequest) -> Result<Course> {
        validate_course_request(&request)?;

        let existing = self
            .courses
            .get_course(id)
            .await?
            .ok_or_else(|| RepositoryError::course_not_found(id))?;
        let course = request.apply_to(existing);
        self.courses.update_course(&course).await?;

        self.cache.invalidate_entity(&id.to_string()).await;
        self.cache.invalidate_all_lists().await;

        info!(course_id = %id, "Course updated");
        Ok(course)
    }

    /// Deletes a course together with its enrollments.
    pub async fn delete_course(&self, id: Uuid) -> Result<()> {
        if self.courses.get_course(id).await?.is_none() {
            return Err(RepositoryError::course_not_found(id).into());
        }
        self.courses.delete_course(id).await?;

        self.cache.invalidate_entity(&id.to_string()).await;
        self.cache.invalidate_all_lists().await;

        info!(course_id = %id, "Course deleted");
        Ok(())
    }

    pub async fn search_courses(&self, query: &CourseQuery) -> Result<CoursePage> {
        let (data, total) = self.courses.search_courses(query).await?;
        debug!(
            page = query.page,
            limit = query.limit,
            total,
            "Course search"
        );
        Ok(CoursePage {
            data,
            pagination: PaginationMeta::new(query, total),
        })
    }

    /// Emails of the students enrolled in a course.
    pub async fn course_students(&self, id: Uuid) -> Result<Vec<String>> {
        self.get_course(id).await?;
        Ok(self.enrollments.students_for_course(id).await?)
    }

    /// Removes one student from a course.
    pub async fn remove_student(&self, id: Uuid, email: &str) -> Result<()> {
        self.get_course(id).await?;
        let email = validate_email(email)?;

        let enrollment = self
            .enrollments
            .find_enrollment(&email, id)
            .await?
            .ok_or_else(|| RepositoryError::enrollment_not_found(format!("{}/{}", email, id)))?;
        self.enrollments.delete_enrollment(enrollment.id).await?;

        info!(course_id = %id, student = %email, "Student removed from course");
        Ok(())
    }

    /// Reports whether the cache backend answers, for health checks.
    pub async fn cache_probe(&self) -> std::result::Result<(), CacheError> {
        self.cache.probe().await
    }

    /// Backend statistics for the cache status endpoint.
    pub async fn cache_stats(&self) -> std::result::Result<CacheStats, CacheError> {
        self.cache.stats().await
    }

    /// Reports whether the course repository answers, for health checks.
    pub async fn storage_probe(&self) -> std::result::Result<(), RepositoryError> {
        self.courses.ping().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use courseware_core::cache::{Cache, TtlPolicy, COURSE_KIND};
    use courseware_core::course::{Difficulty, Enrollment, ValidationError};
    use courseware_core::storage::Result as RepoResult;

    use super::*;
    use crate::cache::MemoryCache;
    use crate::services::ServiceError;
    use crate::storage::InMemoryRepository;

    /// Repository wrapper that counts reads reaching the source of truth.
    struct CountingRepository {
        inner: InMemoryRepository,
        get_calls: AtomicUsize,
        list_calls: AtomicUsize,
    }

    impl CountingRepository {
        fn new(inner: InMemoryRepository) -> Self {
            Self {
                inner,
                get_calls: AtomicUsize::new(0),
                list_calls: AtomicUsize::new(0),
            }
        }

        fn get_calls(&self) -> usize {
            self.get_calls.load(Ordering::SeqCst)
        }

        fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CourseRepository for CountingRepository {
        async fn get_course(&self, id: Uuid) -> RepoResult<Option<Course>> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get_course(id).await
        }

        async fn list_courses(&self) -> RepoResult<Vec<Course>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.list_courses().await
        }

        async fn search_courses(&self, query: &CourseQuery) -> RepoResult<(Vec<Course>, u64)> {
            self.inner.search_courses(query).await
        }

        async fn create_course(&self, course: &Course) -> RepoResult<()> {
            self.inner.create_course(course).await
        }

        async fn update_course(&self, course: &Course) -> RepoResult<()> {
            self.inner.update_course(course).await
        }

        async fn delete_course(&self, id: Uuid) -> RepoResult<()> {
            self.inner.delete_course(id).await
        }
    }

    struct FailingCache;

    #[async_trait]
    impl Cache for FailingCache {
        async fn get(&self, _key: &str) -> courseware_core::cache::Result<Option<Vec<u8>>> {
            Err(CacheError::ConnectionFailed("connection refused".to_string()))
        }

        async fn set(
            &self,
            _key: &str,
            _value: &[u8],
            _ttl: Duration,
        ) -> courseware_core::cache::Result<()> {
            Err(CacheError::ConnectionFailed("connection refused".to_string()))
        }

        async fn delete(&self, _key: &str) -> courseware_core::cache::Result<()> {
            Err(CacheError::ConnectionFailed("connection refused".to_string()))
        }

        async fn ping(&self) -> courseware_core::cache::Result<()> {
            Err(CacheError::ConnectionFailed("connection refused".to_string()))
        }
    }

    struct SlowCache;

    #[async_trait]
    impl Cache for SlowCache {
        async fn get(&self, _key: &str) -> courseware_core::cache::Result<Option<Vec<u8>>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(None)
        }

        async fn set(
            &self,
            _key: &str,
            _value: &[u8],
            _ttl: Duration,
        ) -> courseware_core::cache::Result<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }

        async fn delete(&self, _key: &str) -> courseware_core::cache::Result<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }

        async fn ping(&self) -> courseware_core::cache::Result<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
    }

    struct Fixture {
        service: CatalogService,
        repo: Arc<CountingRepository>,
        store: InMemoryRepository,
    }

    fn fixture_with(cache: Arc<dyn Cache>) -> Fixture {
        let store = InMemoryRepository::new();
        let repo = Arc::new(CountingRepository::new(store.clone()));
        let aside = CacheAside::new(cache, COURSE_KIND, TtlPolicy::default())
            .with_list_tag(COURSE_LIST_TAG);
        let service = CatalogService::new(repo.clone(), Arc::new(store.clone()), aside);
        Fixture {
            service,
            repo,
            store,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(Arc::new(MemoryCache::new(100)))
    }

    fn request(title: &str) -> CourseRequest {
        CourseRequest::new(title, "Learn things", Difficulty::Beginner)
    }

    #[tokio::test]
    async fn test_get_course_populates_cache() {
        let f = fixture();
        let course = f.service.create_course(request("Rust")).await.unwrap();

        let first = f.service.get_course(course.id).await.unwrap();
        let second = f.service.get_course(course.id).await.unwrap();

        assert_eq!(first, course);
        assert_eq!(second, course);
        assert_eq!(f.repo.get_calls(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_course_is_not_found() {
        let f = fixture();
        let result = f.service.get_course(Uuid::new_v4()).await;
        assert!(matches!(
            result,
            Err(ServiceError::Repository(RepositoryError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_list_is_cached_until_create() {
        let f = fixture();
        f.service.create_course(request("First")).await.unwrap();

        assert_eq!(f.service.list_courses().await.unwrap().len(), 1);
        assert_eq!(f.service.list_courses().await.unwrap().len(), 1);
        assert_eq!(f.repo.list_calls(), 1);

        let created = f.service.create_course(request("Second")).await.unwrap();

        let courses = f.service.list_courses().await.unwrap();
        assert_eq!(f.repo.list_calls(), 2);
        assert!(courses.iter().any(|c| c.id == created.id));
    }

    #[tokio::test]
    async fn test_update_invalidates_entity_and_list() {
        let f = fixture();
        let course = f.service.create_course(request("Old title")).await.unwrap();
        f.service.get_course(course.id).await.unwrap();
        f.service.list_courses().await.unwrap();

        f.service
            .update_course(course.id, request("New title"))
            .await
            .unwrap();

        assert_eq!(
            f.service.get_course(course.id).await.unwrap().title,
            "New title"
        );
        assert_eq!(f.service.list_courses().await.unwrap()[0].title, "New title");
    }

    #[tokio::test]
    async fn test_update_missing_course_is_not_found() {
        let f = fixture();
        let result = f.service.update_course(Uuid::new_v4(), request("X")).await;
        assert!(matches!(
            result,
            Err(ServiceError::Repository(RepositoryError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_delete_invalidates_entity_and_list() {
        let f = fixture();
        let course = f.service.create_course(request("Doomed")).await.unwrap();
        f.service.get_course(course.id).await.unwrap();
        f.service.list_courses().await.unwrap();

        f.service.delete_course(course.id).await.unwrap();

        assert!(f.service.get_course(course.id).await.is_err());
        assert!(f.service.list_courses().await.unwrap().is_empty());
        assert!(f.service.delete_course(course.id).await.is_err());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_request() {
        let f = fixture();
        let result = f.service.create_course(request("")).await;
        assert_eq!(
            result,
            Err(ServiceError::Validation(ValidationError::EmptyTitle))
        );
        assert!(f.store.list_courses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failing_cache_is_transparent() {
        let f = fixture_with(Arc::new(FailingCache));
        let course = f.service.create_course(request("Resilient")).await.unwrap();

        assert_eq!(f.service.get_course(course.id).await.unwrap(), course);
        assert_eq!(f.service.list_courses().await.unwrap(), vec![course.clone()]);
        f.service
            .update_course(course.id, request("Still resilient"))
            .await
            .unwrap();
        f.service.delete_course(course.id).await.unwrap();
        assert!(f.service.cache_probe().await.is_err());
    }

    #[tokio::test]
    async fn test_cache_stats_and_storage_probe() {
        let f = fixture();
        let course = f.service.create_course(request("Observable")).await.unwrap();
        f.service.get_course(course.id).await.unwrap();

        let stats = f.service.cache_stats().await.unwrap();
        assert_eq!(stats.backend, "memory");
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.capacity, Some(100));

        assert!(f.service.storage_probe().await.is_ok());
        assert!(matches!(
            fixture_with(Arc::new(FailingCache)).service.cache_stats().await,
            Err(CacheError::Unsupported(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_cache_is_bounded() {
        let f = fixture_with(Arc::new(SlowCache));
        let started = tokio::time::Instant::now();

        let course = f.service.create_course(request("Patient")).await.unwrap();
        assert_eq!(f.service.get_course(course.id).await.unwrap(), course);

        // create: one list delete; get: one get and one set
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_search_bypasses_cache() {
        let f = fixture();
        for title in ["Alpha", "Beta", "Gamma"] {
            f.service.create_course(request(title)).await.unwrap();
        }

        let query = CourseQuery::new(Some(1), Some(2), None, vec![]);
        let page = f.service.search_courses(&query).await.unwrap();

        assert_eq!(page.data.len(), 2);
        assert_eq!(page.pagination.total_count, 3);
        assert_eq!(page.pagination.total_pages, 2);
        assert!(page.pagination.has_next);
        assert_eq!(f.repo.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_course_students_and_remove_student() {
        let f = fixture();
        let course = f.service.create_course(request("Rust")).await.unwrap();
        f.store
            .create_enrollment(&Enrollment::new("ana@example.com", course.id))
            .await
            .unwrap();

        assert_eq!(
            f.service.course_students(course.id).await.unwrap(),
            vec!["ana@example.com"]
        );

        f.service
            .remove_student(course.id, "ana@example.com")
            .await
            .unwrap();
        assert!(f.service.course_students(course.id).await.unwrap().is_empty());

        assert!(matches!(
            f.service.remove_student(course.id, "ana@example.com").await,
            Err(ServiceError::Repository(RepositoryError::NotFound { .. }))
        ));
        assert!(matches!(
            f.service.course_students(Uuid::new_v4()).await,
            Err(ServiceError::Repository(RepositoryError::NotFound { .. }))
        ));
    }
}
