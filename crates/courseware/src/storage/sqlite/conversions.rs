//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use uuid::Uuid;

use courseware_core::course::{Course, Difficulty, Enrollment, EnrollmentDetails, StudentSummary};

/// Convert a SQLite row to a Course.
///
/// Expected columns: id, title, description, difficulty, image_url, created_at, updated_at
pub fn row_to_course(row: &Row) -> rusqlite::Result<Course> {
    course_at(row, 0)
}

/// Convert a SQLite row to an Enrollment.
///
/// Expected columns: id, student_email, course_id, enrolled_at
pub fn row_to_enrollment(row: &Row) -> rusqlite::Result<Enrollment> {
    let id: String = row.get(0)?;
    let student_email: String = row.get(1)?;
    let course_id: String = row.get(2)?;
    let enrolled_at: String = row.get(3)?;

    Ok(Enrollment {
        id: parse_uuid(&id)?,
        student_email,
        course_id: parse_uuid(&course_id)?,
        enrolled_at: parse_datetime(&enrolled_at)?,
    })
}

/// Convert a joined enrollment + course row.
///
/// Expected columns: the four enrollment columns followed by the seven course columns.
pub fn row_to_enrollment_details(row: &Row) -> rusqlite::Result<EnrollmentDetails> {
    Ok(EnrollmentDetails {
        enrollment: row_to_enrollment(row)?,
        course: course_at(row, 4)?,
    })
}

/// Convert an aggregate row to a StudentSummary.
///
/// Expected columns: student_email, count, max(enrolled_at)
pub fn row_to_student_summary(row: &Row) -> rusqlite::Result<StudentSummary> {
    let email: String = row.get(0)?;
    let count: i64 = row.get(1)?;
    let last_enrolled_at: String = row.get(2)?;

    Ok(StudentSummary {
        email,
        enrollment_count: u64::try_from(count).unwrap_or_default(),
        last_enrolled_at: parse_datetime(&last_enrolled_at)?,
    })
}

fn course_at(row: &Row, offset: usize) -> rusqlite::Result<Course> {
    let id: String = row.get(offset)?;
    let title: String = row.get(offset + 1)?;
    let description: String = row.get(offset + 2)?;
    let difficulty: String = row.get(offset + 3)?;
    let image_url: Option<String> = row.get(offset + 4)?;
    let created_at: String = row.get(offset + 5)?;
    let updated_at: String = row.get(offset + 6)?;

    Ok(Course {
        id: parse_uuid(&id)?,
        title,
        description,
        difficulty: parse_difficulty(&difficulty)?,
        image_url,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

fn conversion_error(e: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
}

fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(conversion_error)
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(conversion_error)
}

fn parse_difficulty(s: &str) -> rusqlite::Result<Difficulty> {
    Difficulty::parse(s).ok_or_else(|| {
        conversion_error(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Invalid difficulty: {}", s),
        ))
    })
}

/// Format a DateTime for SQLite storage.
///
/// Fixed-width nanosecond precision keeps lexicographic order equal to
/// chronological order for `ORDER BY`.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}
