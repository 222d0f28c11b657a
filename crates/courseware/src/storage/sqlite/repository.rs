//! SQLite repository implementation.
//!
//! Implements the repository traits from `courseware_core::storage` using SQLite.

use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use courseware_core::course::{Course, Enrollment, EnrollmentDetails, StudentSummary};
use courseware_core::storage::{
    CourseQuery, CourseRepository, EnrollmentRepository, RepositoryError, Result,
};

use super::conversions::{
    format_datetime, row_to_course, row_to_enrollment, row_to_enrollment_details,
    row_to_student_summary,
};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Fails with `QueryReturnedNoRows` when a write touched nothing.
fn expect_rows(rows: usize) -> std::result::Result<(), tokio_rusqlite::Error> {
    if rows == 0 {
        Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
    } else {
        Ok(())
    }
}

/// SQLite-based repository for courses and enrollments.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn query_details(
        &self,
        sql: String,
        params: Vec<Value>,
    ) -> Result<Vec<EnrollmentDetails>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(params), row_to_enrollment_details)
                    .map_err(wrap_err)?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Enrollment", "list"))
    }
}

// ============================================================================
// CourseRepository implementation
// ============================================================================

#[async_trait]
impl CourseRepository for SqliteRepository {
    async fn get_course(&self, id: Uuid) -> Result<Option<Course>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_COURSE_BY_ID).map_err(wrap_err)?;
                stmt.query_row([&id_str], row_to_course)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Course", id.to_string()))
    }

    async fn list_courses(&self) -> Result<Vec<Course>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_ALL_COURSES).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_course).map_err(wrap_err)?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Course", "list"))
    }

    async fn search_courses(&self, query: &CourseQuery) -> Result<(Vec<Course>, u64)> {
        let (filter, params) = schema::course_search_filter(query);
        let limit = i64::from(query.limit);
        let offset = i64::try_from(query.offset()).unwrap_or(i64::MAX);

        self.conn
            .call(move |conn| {
                let count_sql = format!("SELECT COUNT(*) FROM courses {}", filter);
                let total: i64 = conn
                    .query_row(&count_sql, rusqlite::params_from_iter(params.iter()), |row| {
                        row.get(0)
                    })
                    .map_err(wrap_err)?;

                let page_sql = format!(
                    "SELECT {} FROM courses {} ORDER BY created_at DESC LIMIT ?{} OFFSET ?{}",
                    schema::COURSE_COLUMNS,
                    filter,
                    params.len() + 1,
                    params.len() + 2
                );
                let mut page_params = params;
                page_params.push(Value::Integer(limit));
                page_params.push(Value::Integer(offset));

                let mut stmt = conn.prepare(&page_sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(page_params), row_to_course)
                    .map_err(wrap_err)?;
                let courses = rows.collect::<rusqlite::Result<Vec<_>>>().map_err(wrap_err)?;

                Ok((courses, u64::try_from(total).unwrap_or_default()))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Course", "search"))
    }

    async fn create_course(&self, course: &Course) -> Result<()> {
        let id = course.id.to_string();
        let title = course.title.clone();
        let description = course.description.clone();
        let difficulty = course.difficulty.as_str();
        let image_url = course.image_url.clone();
        let created_at = format_datetime(&course.created_at);
        let updated_at = format_datetime(&course.updated_at);
        let course_id = course.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_COURSE,
                    rusqlite::params![
                        id,
                        title,
                        description,
                        difficulty,
                        image_url,
                        created_at,
                        updated_at
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Course", course_id))
    }

    async fn update_course(&self, course: &Course) -> Result<()> {
        let id = course.id.to_string();
        let title = course.title.clone();
        let description = course.description.clone();
        let difficulty = course.difficulty.as_str();
        let image_url = course.image_url.clone();
        let updated_at = format_datetime(&course.updated_at);
        let course_id = course.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_COURSE,
                        rusqlite::params![title, description, difficulty, image_url, updated_at, id],
                    )
                    .map_err(wrap_err)?;
                expect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Course", course_id))
    }

    async fn delete_course(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_COURSE, [&id_str])
                    .map_err(wrap_err)?;
                expect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Course", id.to_string()))
    }

    async fn ping(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                    .map_err(wrap_err)
            })
            .await
            .map(|_| ())
            .map_err(|e| map_tokio_rusqlite_error(e, "Database", "ping"))
    }
}

// ============================================================================
// EnrollmentRepository implementation
// ============================================================================

#[async_trait]
impl EnrollmentRepository for SqliteRepository {
    async fn create_enrollment(&self, enrollment: &Enrollment) -> Result<()> {
        if self.get_course(enrollment.course_id).await?.is_none() {
            return Err(RepositoryError::course_not_found(enrollment.course_id));
        }

        let id = enrollment.id.to_string();
        let student_email = enrollment.student_email.clone();
        let course_id = enrollment.course_id.to_string();
        let enrolled_at = format_datetime(&enrollment.enrolled_at);
        let key = format!("{}/{}", enrollment.student_email, enrollment.course_id);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_ENROLLMENT,
                    rusqlite::params![id, student_email, course_id, enrolled_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Enrollment", key))
    }

    async fn get_enrollment(&self, id: Uuid) -> Result<Option<Enrollment>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ENROLLMENT_BY_ID)
                    .map_err(wrap_err)?;
                stmt.query_row([&id_str], row_to_enrollment)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Enrollment", id.to_string()))
    }

    async fn find_enrollment(
        &self,
        student_email: &str,
        course_id: Uuid,
    ) -> Result<Option<Enrollment>> {
        let email = student_email.to_string();
        let course_id_str = course_id.to_string();
        let key = format!("{}/{}", student_email, course_id);

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ENROLLMENT_BY_STUDENT_AND_COURSE)
                    .map_err(wrap_err)?;
                stmt.query_row([&email, &course_id_str], row_to_enrollment)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Enrollment", key))
    }

    async fn enrollments_for_student(
        &self,
        student_email: &str,
    ) -> Result<Vec<EnrollmentDetails>> {
        self.query_details(
            schema::select_enrollment_details_by_student(),
            vec![Value::Text(student_email.to_string())],
        )
        .await
    }

    async fn students_for_course(&self, course_id: Uuid) -> Result<Vec<String>> {
        let course_id_str = course_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_STUDENTS_BY_COURSE)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&course_id_str], |row| row.get::<_, String>(0))
                    .map_err(wrap_err)?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Enrollment", course_id.to_string()))
    }

    async fn all_enrollments(&self) -> Result<Vec<EnrollmentDetails>> {
        self.query_details(schema::select_all_enrollment_details(), Vec::new())
            .await
    }

    async fn student_summaries(&self) -> Result<Vec<StudentSummary>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_STUDENT_SUMMARIES)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([], row_to_student_summary)
                    .map_err(wrap_err)?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Enrollment", "summaries"))
    }

    async fn delete_enrollment(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_ENROLLMENT, [&id_str])
                    .map_err(wrap_err)?;
                expect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Enrollment", id.to_string()))
    }
}
