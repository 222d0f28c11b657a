use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use courseware_core::course::{Course, CourseRequest, ListCoursesQuery};

use crate::{auth::AdminUser, handlers::AppError, state::AppState};

/// List courses (GET /api/v1/courses).
///
/// Returns the full catalog as a plain array, or a paginated page when any of
/// `page`, `limit`, `search` or `difficulty` is given.
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<ListCoursesQuery>,
) -> Result<Response, AppError> {
    if query.is_filtered() {
        let page = state
            .catalog
            .search_courses(&query.to_course_query())
            .await?;
        return Ok(Json(page).into_response());
    }

    let courses = state.catalog.list_courses().await?;
    Ok(Json(courses).into_response())
}

/// Get a single course (GET /api/v1/courses/{id}).
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Course>, AppError> {
    Ok(Json(state.catalog.get_course(id).await?))
}

/// Create a course (POST /api/v1/courses).
pub async fn create_course(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<CourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    let course = state.catalog.create_course(payload).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// Update a course (PUT /api/v1/courses/{id}).
pub async fn update_course(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CourseRequest>,
) -> Result<Json<Course>, AppError> {
    Ok(Json(state.catalog.update_course(id, payload).await?))
}

/// Delete a course and its enrollments (DELETE /api/v1/courses/{id}).
pub async fn delete_course(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete_course(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Students enrolled in a course (GET /api/v1/courses/{id}/students).
pub async fn course_students(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let students = state.catalog.course_students(id).await?;
    Ok(Json(json!({
        "total": students.len(),
        "students": students,
    })))
}

/// Remove a student from a course (DELETE /api/v1/courses/{id}/students/{email}).
pub async fn remove_student(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path((id, email)): Path<(Uuid, String)>,
) -> Result<StatusCode, AppError> {
    state.catalog.remove_student(id, &email).await?;
    Ok(StatusCode::NO_CONTENT)
}
