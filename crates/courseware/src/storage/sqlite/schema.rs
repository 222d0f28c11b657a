//! SQLite schema definitions and SQL query constants.

use rusqlite::types::Value;

use courseware_core::storage::CourseQuery;

/// SQL statement to create all tables.
///
/// Foreign keys are enabled per connection, so the pragma lives here too.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

-- Courses table
CREATE TABLE IF NOT EXISTS courses (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    difficulty TEXT NOT NULL,
    image_url TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Enrollments table
CREATE TABLE IF NOT EXISTS enrollments (
    id TEXT PRIMARY KEY,
    student_email TEXT NOT NULL,
    course_id TEXT NOT NULL,
    enrolled_at TEXT NOT NULL,
    UNIQUE (student_email, course_id),
    FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_courses_created_at ON courses(created_at);
CREATE INDEX IF NOT EXISTS idx_enrollments_course_id ON enrollments(course_id);
CREATE INDEX IF NOT EXISTS idx_enrollments_student_email ON enrollments(student_email);
"#;

// Course queries
pub const COURSE_COLUMNS: &str =
    "id, title, description, difficulty, image_url, created_at, updated_at";

pub const INSERT_COURSE: &str = r#"
INSERT INTO courses (id, title, description, difficulty, image_url, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const SELECT_COURSE_BY_ID: &str = r#"
SELECT id, title, description, difficulty, image_url, created_at, updated_at
FROM courses
WHERE id = ?1
"#;

pub const SELECT_ALL_COURSES: &str = r#"
SELECT id, title, description, difficulty, image_url, created_at, updated_at
FROM courses
ORDER BY created_at DESC
"#;

pub const UPDATE_COURSE: &str = r#"
UPDATE courses
SET title = ?1, description = ?2, difficulty = ?3, image_url = ?4, updated_at = ?5
WHERE id = ?6
"#;

pub const DELETE_COURSE: &str = r#"
DELETE FROM courses WHERE id = ?1
"#;

// Enrollment queries
pub const INSERT_ENROLLMENT: &str = r#"
INSERT INTO enrollments (id, student_email, course_id, enrolled_at)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const SELECT_ENROLLMENT_BY_ID: &str = r#"
SELECT id, student_email, course_id, enrolled_at
FROM enrollments
WHERE id = ?1
"#;

pub const SELECT_ENROLLMENT_BY_STUDENT_AND_COURSE: &str = r#"
SELECT id, student_email, course_id, enrolled_at
FROM enrollments
WHERE student_email = ?1 AND course_id = ?2
"#;

const ENROLLMENT_DETAILS_SELECT: &str = r#"
SELECT e.id, e.student_email, e.course_id, e.enrolled_at,
       c.id, c.title, c.description, c.difficulty, c.image_url, c.created_at, c.updated_at
FROM enrollments e
JOIN courses c ON c.id = e.course_id
"#;

pub fn select_enrollment_details_by_student() -> String {
    format!(
        "{} WHERE e.student_email = ?1 ORDER BY e.enrolled_at DESC",
        ENROLLMENT_DETAILS_SELECT
    )
}

pub fn select_all_enrollment_details() -> String {
    format!("{} ORDER BY e.enrolled_at DESC", ENROLLMENT_DETAILS_SELECT)
}

pub const SELECT_STUDENTS_BY_COURSE: &str = r#"
SELECT student_email
FROM enrollments
WHERE course_id = ?1
ORDER BY enrolled_at ASC
"#;

pub const SELECT_STUDENT_SUMMARIES: &str = r#"
SELECT student_email, COUNT(*), MAX(enrolled_at)
FROM enrollments
GROUP BY student_email
ORDER BY student_email ASC
"#;

pub const DELETE_ENROLLMENT: &str = r#"
DELETE FROM enrollments WHERE id = ?1
"#;

/// Builds the `WHERE` clause and its parameters for a course search.
///
/// Returns an empty clause when the query has no filters.
pub fn course_search_filter(query: &CourseQuery) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut params = Vec::new();

    if let Some(search) = &query.search {
        let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
        params.push(Value::Text(pattern.clone()));
        let title_idx = params.len();
        params.push(Value::Text(pattern));
        let description_idx = params.len();
        clauses.push(format!(
            "(lower(title) LIKE ?{title_idx} ESCAPE '\\' OR lower(description) LIKE ?{description_idx} ESCAPE '\\')"
        ));
    }

    if !query.difficulties.is_empty() {
        let mut placeholders = Vec::new();
        for difficulty in &query.difficulties {
            params.push(Value::Text(difficulty.as_str().to_string()));
            placeholders.push(format!("?{}", params.len()));
        }
        clauses.push(format!("difficulty IN ({})", placeholders.join(", ")));
    }

    if clauses.is_empty() {
        (String::new(), params)
    } else {
        (format!("WHERE {}", clauses.join(" AND ")), params)
    }
}

/// Escapes `%`, `_` and `\` for use inside a `LIKE .. ESCAPE '\'` pattern.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use courseware_core::course::Difficulty;

    #[test]
    fn test_search_filter_empty() {
        let (clause, params) = course_search_filter(&CourseQuery::default());
        assert!(clause.is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn test_search_filter_with_search_and_difficulties() {
        let query = CourseQuery::new(
            None,
            None,
            Some("Go".to_string()),
            vec![Difficulty::Beginner, Difficulty::Advanced],
        );
        let (clause, params) = course_search_filter(&query);

        assert!(clause.starts_with("WHERE (lower(title) LIKE ?1"));
        assert!(clause.contains("difficulty IN (?3, ?4)"));
        assert_eq!(params.len(), 4);
        assert_eq!(params[0], Value::Text("%go%".to_string()));
        assert_eq!(params[3], Value::Text("Advanced".to_string()));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%_done"), "100\\%\\_done");
        assert_eq!(escape_like("plain"), "plain");
    }
}
