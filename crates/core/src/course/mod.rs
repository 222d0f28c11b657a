mod error;
mod operations;
mod requests;
mod types;

pub use error::ValidationError;
pub use operations::{validate_course_request, validate_email, MAX_TITLE_LEN};
pub use requests::{CourseRequest, EnrollmentRequest, ListCoursesQuery};
pub use types::{
    AllEnrollments, AllStudents, Course, Difficulty, Enrollment, EnrollmentDetails,
    StudentEnrollments, StudentSummary,
};
