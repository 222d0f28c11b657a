use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Course difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Returns the name used in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    /// Parses an exact difficulty name, ignoring surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Beginner" => Some(Difficulty::Beginner),
            "Intermediate" => Some(Difficulty::Intermediate),
            "Advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A course in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Creates a new course with a fresh ID and the current time.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        difficulty: Difficulty,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            difficulty,
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the cover image URL.
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Sets a specific ID for this course (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }
}

/// A student's enrollment in a course. Students are identified by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Uuid,
    pub student_email: String,
    pub course_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
}

impl Enrollment {
    /// Creates a new enrollment stamped with the current time.
    pub fn new(student_email: impl Into<String>, course_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_email: student_email.into(),
            course_id,
            enrolled_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_enrolled_at(mut self, enrolled_at: DateTime<Utc>) -> Self {
        self.enrolled_at = enrolled_at;
        self
    }
}

/// An enrollment joined with the course it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentDetails {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub course: Course,
}

/// All enrollments of one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentEnrollments {
    pub student_email: String,
    pub enrollments: Vec<EnrollmentDetails>,
    pub total: usize,
}

impl StudentEnrollments {
    pub fn new(student_email: impl Into<String>, enrollments: Vec<EnrollmentDetails>) -> Self {
        Self {
            student_email: student_email.into(),
            total: enrollments.len(),
            enrollments,
        }
    }
}

/// Per-student aggregate shown in the admin view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub email: String,
    pub enrollment_count: u64,
    pub last_enrolled_at: DateTime<Utc>,
}

/// Admin listing of every student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllStudents {
    pub students: Vec<StudentSummary>,
    pub total: usize,
}

impl From<Vec<StudentSummary>> for AllStudents {
    fn from(students: Vec<StudentSummary>) -> Self {
        Self {
            total: students.len(),
            students,
        }
    }
}

/// Admin listing of every enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllEnrollments {
    pub enrollments: Vec<EnrollmentDetails>,
    pub total: usize,
}

impl From<Vec<EnrollmentDetails>> for AllEnrollments {
    fn from(enrollments: Vec<EnrollmentDetails>) -> Self {
        Self {
            total: enrollments.len(),
            enrollments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse_is_exact() {
        assert_eq!(Difficulty::parse("Beginner"), Some(Difficulty::Beginner));
        assert_eq!(
            Difficulty::parse(" Intermediate "),
            Some(Difficulty::Intermediate)
        );
        assert_eq!(Difficulty::parse("Advanced"), Some(Difficulty::Advanced));
        assert_eq!(Difficulty::parse("beginner"), None);
        assert_eq!(Difficulty::parse("expert"), None);
    }

    #[test]
    fn test_difficulty_serializes_by_name() {
        let json = serde_json::to_string(&Difficulty::Intermediate).unwrap();
        assert_eq!(json, "\"Intermediate\"");
    }

    #[test]
    fn test_course_new_sets_timestamps() {
        let course = Course::new("Rust", "Ownership and borrowing", Difficulty::Beginner);
        assert_eq!(course.created_at, course.updated_at);
        assert!(course.image_url.is_none());
    }

    #[test]
    fn test_student_enrollments_total() {
        let course = Course::new("Rust", "Intro", Difficulty::Beginner);
        let enrollment = Enrollment::new("ana@example.com", course.id);
        let all = StudentEnrollments::new(
            "ana@example.com",
            vec![EnrollmentDetails { enrollment, course }],
        );
        assert_eq!(all.total, 1);
    }

    #[test]
    fn test_enrollment_details_flattens_enrollment() {
        let course = Course::new("Rust", "Intro", Difficulty::Beginner);
        let enrollment = Enrollment::new("ana@example.com", course.id);
        let details = EnrollmentDetails { enrollment, course };
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["student_email"], "ana@example.com");
        assert_eq!(value["course"]["title"], "Rust");
    }
}
