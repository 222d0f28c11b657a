mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use traits::{CourseRepository, EnrollmentRepository};
pub use types::{CoursePage, CourseQuery, PaginationMeta, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
