use async_trait::async_trait;
use uuid::Uuid;

use super::types::CourseQuery;
use super::Result;
use crate::course::{Course, Enrollment, EnrollmentDetails, StudentSummary};

/// Repository for course data.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Gets a course by ID.
    async fn get_course(&self, id: Uuid) -> Result<Option<Course>>;

    /// Lists every course, newest first.
    async fn list_courses(&self) -> Result<Vec<Course>>;

    /// Returns one page of courses matching the query, newest first, plus the
    /// total number of matches.
    async fn search_courses(&self, query: &CourseQuery) -> Result<(Vec<Course>, u64)>;

    /// Creates a new course.
    async fn create_course(&self, course: &Course) -> Result<()>;

    /// Replaces an existing course.
    async fn update_course(&self, course: &Course) -> Result<()>;

    /// Deletes a course and every enrollment in it.
    async fn delete_course(&self, id: Uuid) -> Result<()>;

    /// Checks that the store answers a trivial read.
    async fn ping(&self) -> Result<()> {
        self.get_course(Uuid::nil()).await.map(|_| ())
    }
}

/// Repository for enrollment data.
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Creates an enrollment. A second enrollment of the same student in the
    /// same course is `AlreadyExists`.
    async fn create_enrollment(&self, enrollment: &Enrollment) -> Result<()>;

    /// Gets an enrollment by ID.
    async fn get_enrollment(&self, id: Uuid) -> Result<Option<Enrollment>>;

    /// Finds the enrollment of a student in a course.
    async fn find_enrollment(&self, student_email: &str, course_id: Uuid)
        -> Result<Option<Enrollment>>;

    /// Enrollments of a student joined with their courses, newest first.
    async fn enrollments_for_student(&self, student_email: &str)
        -> Result<Vec<EnrollmentDetails>>;

    /// Emails of the students enrolled in a course, in enrollment order.
    async fn students_for_course(&self, course_id: Uuid) -> Result<Vec<String>>;

    /// Every enrollment joined with its course, newest first.
    async fn all_enrollments(&self) -> Result<Vec<EnrollmentDetails>>;

    /// One summary per distinct student, ordered by email.
    async fn student_summaries(&self) -> Result<Vec<StudentSummary>>;

    /// Deletes an enrollment by ID.
    async fn delete_enrollment(&self, id: Uuid) -> Result<()>;
}
