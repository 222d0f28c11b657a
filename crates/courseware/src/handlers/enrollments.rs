use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use courseware_core::course::{EnrollmentRequest, StudentEnrollments};

use crate::{auth::AdminUser, handlers::AppError, state::AppState};

/// Enroll a student (POST /api/v1/enrollments).
pub async fn enroll_student(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<EnrollmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let details = state.enrollments.enroll(payload).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// A student's enrollments (GET /api/v1/students/{email}/enrollments).
pub async fn student_enrollments(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<StudentEnrollments>, AppError> {
    Ok(Json(state.enrollments.student_enrollments(&email).await?))
}

/// Unenroll a student (DELETE /api/v1/students/{email}/enrollments/{course_id}).
pub async fn unenroll_student(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path((email, course_id)): Path<(String, Uuid)>,
) -> Result<StatusCode, AppError> {
    state.enrollments.unenroll(&email, course_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
