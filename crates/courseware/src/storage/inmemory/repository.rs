//! In-memory repository implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use courseware_core::course::{Course, Enrollment, EnrollmentDetails, StudentSummary};
use courseware_core::storage::{
    CourseQuery, CourseRepository, EnrollmentRepository, RepositoryError, Result,
};

/// In-memory storage backend.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    courses: Arc<RwLock<HashMap<Uuid, Course>>>,
    enrollments: Arc<RwLock<HashMap<Uuid, Enrollment>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    async fn details(&self, mut enrollments: Vec<Enrollment>) -> Vec<EnrollmentDetails> {
        let courses = self.courses.read().await;
        enrollments.sort_by(|a, b| b.enrolled_at.cmp(&a.enrolled_at));
        enrollments
            .into_iter()
            .filter_map(|enrollment| {
                let course = courses.get(&enrollment.course_id)?.clone();
                Some(EnrollmentDetails { enrollment, course })
            })
            .collect()
    }
}

fn newest_first(courses: &mut [Course]) {
    courses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[async_trait]
impl CourseRepository for InMemoryRepository {
    async fn get_course(&self, id: Uuid) -> Result<Option<Course>> {
        let courses = self.courses.read().await;
        Ok(courses.get(&id).cloned())
    }

    async fn list_courses(&self) -> Result<Vec<Course>> {
        let courses = self.courses.read().await;
        let mut all: Vec<Course> = courses.values().cloned().collect();
        newest_first(&mut all);
        Ok(all)
    }

    async fn search_courses(&self, query: &CourseQuery) -> Result<(Vec<Course>, u64)> {
        let courses = self.courses.read().await;
        let mut matching: Vec<Course> = courses
            .values()
            .filter(|c| query.matches(c))
            .cloned()
            .collect();
        newest_first(&mut matching);

        let total = matching.len() as u64;
        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let page = matching
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn create_course(&self, course: &Course) -> Result<()> {
        let mut courses = self.courses.write().await;
        if courses.contains_key(&course.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Course",
                id: course.id.to_string(),
            });
        }
        courses.insert(course.id, course.clone());
        Ok(())
    }

    async fn update_course(&self, course: &Course) -> Result<()> {
        let mut courses = self.courses.write().await;
        if !courses.contains_key(&course.id) {
            return Err(RepositoryError::course_not_found(course.id));
        }
        courses.insert(course.id, course.clone());
        Ok(())
    }

    async fn delete_course(&self, id: Uuid) -> Result<()> {
        let mut courses = self.courses.write().await;
        if courses.remove(&id).is_none() {
            return Err(RepositoryError::course_not_found(id));
        }
        let mut enrollments = self.enrollments.write().await;
        enrollments.retain(|_, e| e.course_id != id);
        Ok(())
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryRepository {
    async fn create_enrollment(&self, enrollment: &Enrollment) -> Result<()> {
        // Held until the insert so a concurrent delete_course cannot orphan
        // the enrollment. Lock order is courses, then enrollments.
        let courses = self.courses.read().await;
        if !courses.contains_key(&enrollment.course_id) {
            return Err(RepositoryError::course_not_found(enrollment.course_id));
        }

        let mut enrollments = self.enrollments.write().await;
        let duplicate = enrollments.values().any(|e| {
            e.course_id == enrollment.course_id && e.student_email == enrollment.student_email
        });
        if duplicate || enrollments.contains_key(&enrollment.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Enrollment",
                id: format!("{}/{}", enrollment.student_email, enrollment.course_id),
            });
        }
        enrollments.insert(enrollment.id, enrollment.clone());
        drop(courses);
        Ok(())
    }

    async fn get_enrollment(&self, id: Uuid) -> Result<Option<Enrollment>> {
        let enrollments = self.enrollments.read().await;
        Ok(enrollments.get(&id).cloned())
    }

    async fn find_enrollment(
        &self,
        student_email: &str,
        course_id: Uuid,
    ) -> Result<Option<Enrollment>> {
        let enrollments = self.enrollments.read().await;
        Ok(enrollments
            .values()
            .find(|e| e.course_id == course_id && e.student_email == student_email)
            .cloned())
    }

    async fn enrollments_for_student(
        &self,
        student_email: &str,
    ) -> Result<Vec<EnrollmentDetails>> {
        let matching: Vec<Enrollment> = {
            let enrollments = self.enrollments.read().await;
            enrollments
                .values()
                .filter(|e| e.student_email == student_email)
                .cloned()
                .collect()
        };
        Ok(self.details(matching).await)
    }

    async fn students_for_course(&self, course_id: Uuid) -> Result<Vec<String>> {
        let enrollments = self.enrollments.read().await;
        let mut matching: Vec<&Enrollment> = enrollments
            .values()
            .filter(|e| e.course_id == course_id)
            .collect();
        matching.sort_by(|a, b| a.enrolled_at.cmp(&b.enrolled_at));
        Ok(matching
            .into_iter()
            .map(|e| e.student_email.clone())
            .collect())
    }

    async fn all_enrollments(&self) -> Result<Vec<EnrollmentDetails>> {
        let all: Vec<Enrollment> = self.enrollments.read().await.values().cloned().collect();
        Ok(self.details(all).await)
    }

    async fn student_summaries(&self) -> Result<Vec<StudentSummary>> {
        let enrollments = self.enrollments.read().await;
        let mut by_email: BTreeMap<&str, StudentSummary> = BTreeMap::new();
        for e in enrollments.values() {
            by_email
                .entry(e.student_email.as_str())
                .and_modify(|s| {
                    s.enrollment_count += 1;
                    s.last_enrolled_at = s.last_enrolled_at.max(e.enrolled_at);
                })
                .or_insert_with(|| StudentSummary {
                    email: e.student_email.clone(),
                    enrollment_count: 1,
                    last_enrolled_at: e.enrolled_at,
                });
        }
        Ok(by_email.into_values().collect())
    }

    async fn delete_enrollment(&self, id: Uuid) -> Result<()> {
        let mut enrollments = self.enrollments.write().await;
        if enrollments.remove(&id).is_none() {
            return Err(RepositoryError::enrollment_not_found(id));
        }
        Ok(())
    }
}
