use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use courseware_core::course::{AllEnrollments, AllStudents};

use crate::{auth::AdminUser, handlers::AppError, state::AppState};

/// GET /api/v1/admin/students
pub async fn list_students(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<AllStudents>, AppError> {
    Ok(Json(state.enrollments.all_students().await?))
}

/// GET /api/v1/admin/enrollments
pub async fn list_enrollments(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<AllEnrollments>, AppError> {
    Ok(Json(state.enrollments.all_enrollments().await?))
}

/// DELETE /api/v1/admin/enrollments/{id}
pub async fn delete_enrollment(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.enrollments.delete_enrollment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
