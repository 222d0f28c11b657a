use axum::{extract::State, Json};

use courseware_core::auth::{LoginRequest, LoginResponse, Principal};

use crate::{auth::AdminUser, handlers::AppError, state::AppState};

/// Log in as the administrator (POST /api/v1/auth/login).
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    Ok(Json(state.auth.login(&payload)?))
}

/// The authenticated administrator (GET /api/v1/auth/profile).
pub async fn profile(AdminUser(principal): AdminUser) -> Json<Principal> {
    Json(principal)
}
