use thiserror::Error;

/// Validation failures for course and enrollment input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Course title cannot be empty")]
    EmptyTitle,
    #[error("Course title too long (max {0} characters)")]
    TitleTooLong(usize),
    #[error("Course description cannot be empty")]
    EmptyDescription,
    #[error("Invalid image URL: {0}")]
    InvalidImageUrl(String),
    #[error("Invalid student email: {0}")]
    InvalidEmail(String),
}
