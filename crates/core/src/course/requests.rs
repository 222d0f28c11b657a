//! API request types for course and enrollment operations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{Course, Difficulty};
use crate::serde::{deserialize_optional_positive, deserialize_optional_string};
use crate::storage::CourseQuery;

/// Request payload for creating or replacing a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRequest {
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
}

impl CourseRequest {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            difficulty,
            image_url: None,
        }
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Convert into a new Course with a fresh ID.
    pub fn into_course(self) -> Course {
        let mut course = Course::new(self.title.trim(), self.description.trim(), self.difficulty);
        course.image_url = self.image_url;
        course
    }

    /// Apply this request to an existing course, bumping `updated_at`.
    pub fn apply_to(self, mut course: Course) -> Course {
        course.title = self.title.trim().to_string();
        course.description = self.description.trim().to_string();
        course.difficulty = self.difficulty;
        course.image_url = self.image_url;
        course.updated_at = chrono::Utc::now();
        course
    }
}

/// Request payload for enrolling a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRequest {
    pub student_email: String,
    pub course_id: Uuid,
}

/// Query parameters accepted by the course listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCoursesQuery {
    /// Positive page number; anything else is treated as absent.
    #[serde(default, deserialize_with = "deserialize_optional_positive")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_positive")]
    pub limit: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
    /// Comma separated difficulty names, e.g. `Beginner,Advanced`.
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub difficulty: Option<String>,
}

impl ListCoursesQuery {
    /// True when any usable paging or filtering parameter was given.
    ///
    /// Decided on normalized values: a query whose only difficulty names are
    /// unknown is not filtered. A bare listing is served from the cached
    /// catalog snapshot; anything else goes to the repository.
    pub fn is_filtered(&self) -> bool {
        self.page.is_some()
            || self.limit.is_some()
            || self.search.is_some()
            || !self.difficulties().is_empty()
    }

    /// Parses the raw parameters into a normalized [`CourseQuery`].
    ///
    /// Unknown difficulty names are ignored.
    pub fn to_course_query(&self) -> CourseQuery {
        CourseQuery::new(
            self.page,
            self.limit,
            self.search.clone(),
            self.difficulties(),
        )
    }

    fn difficulties(&self) -> Vec<Difficulty> {
        let mut difficulties = Vec::new();
        if let Some(raw) = &self.difficulty {
            for difficulty in raw.split(',').filter_map(Difficulty::parse) {
                if !difficulties.contains(&difficulty) {
                    difficulties.push(difficulty);
                }
            }
        }
        difficulties
    }
}
