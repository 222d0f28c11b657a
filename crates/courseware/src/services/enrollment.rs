//! Enrollment service. Enrollment data is never cached.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use courseware_core::course::{
    validate_email, AllEnrollments, AllStudents, Enrollment, EnrollmentDetails, EnrollmentRequest,
    StudentEnrollments,
};
use courseware_core::storage::{CourseRepository, EnrollmentRepository, RepositoryError};

use super::error::Result;

pub struct EnrollmentService {
    courses: Arc<dyn CourseRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl EnrollmentService {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
    ) -> Self {
        Self {
            courses,
            enrollments,
        }
    }

    /// Enrolls a student in a course.
    ///
    /// Fails with `NotFound` when the course does not exist and with
    /// `AlreadyExists` when the student is already enrolled in it.
    pub async fn enroll(&self, request: EnrollmentRequest) -> Result<EnrollmentDetails> {
        let email = validate_email(&request.student_email)?;
        let course = self
            .courses
            .get_course(request.course_id)
            .await?
            .ok_or_else(|| RepositoryError::course_not_found(request.course_id))?;

        let enrollment = Enrollment::new(email, course.id);
        self.enrollments.create_enrollment(&enrollment).await?;

        info!(
            enrollment_id = %enrollment.id,
            course_id = %course.id,
            student = %enrollment.student_email,
            "Student enrolled"
        );
        Ok(EnrollmentDetails { enrollment, course })
    }

    pub async fn student_enrollments(&self, email: &str) -> Result<StudentEnrollments> {
        let email = validate_email(email)?;
        let enrollments = self.enrollments.enrollments_for_student(&email).await?;
        Ok(StudentEnrollments::new(email, enrollments))
    }

    pub async fn unenroll(&self, email: &str, course_id: Uuid) -> Result<()> {
        let email = validate_email(email)?;
        let enrollment = self
            .enrollments
            .find_enrollment(&email, course_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::enrollment_not_found(format!("{}/{}", email, course_id))
            })?;
        self.enrollments.delete_enrollment(enrollment.id).await?;

        info!(course_id = %course_id, student = %email, "Student unenrolled");
        Ok(())
    }

    pub async fn all_students(&self) -> Result<AllStudents> {
        Ok(self.enrollments.student_summaries().await?.into())
    }

    pub async fn all_enrollments(&self) -> Result<AllEnrollments> {
        Ok(self.enrollments.all_enrollments().await?.into())
    }

    pub async fn delete_enrollment(&self, id: Uuid) -> Result<()> {
        if self.enrollments.get_enrollment(id).await?.is_none() {
            return Err(RepositoryError::enrollment_not_found(id).into());
        }
        self.enrollments.delete_enrollment(id).await?;

        info!(enrollment_id = %id, "Enrollment deleted");
        Ok(())
    }
}
