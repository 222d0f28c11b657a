use url::Url;

use super::error::ValidationError;
use super::requests::CourseRequest;

/// Maximum course title length, in characters.
pub const MAX_TITLE_LEN: usize = 255;

/// Validates a course request before creation or update.
pub fn validate_course_request(request: &CourseRequest) -> Result<(), ValidationError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong(MAX_TITLE_LEN));
    }
    if request.description.trim().is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    if let Some(image_url) = &request.image_url {
        if !is_valid_image_url(image_url) {
            return Err(ValidationError::InvalidImageUrl(image_url.clone()));
        }
    }
    Ok(())
}

/// Validates a student email and returns it trimmed.
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim();
    if is_valid_email(email) {
        Ok(email.to_string())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

fn is_valid_image_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}
