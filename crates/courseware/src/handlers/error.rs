use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use courseware_core::auth::AuthError;
use courseware_core::cache::CacheError;
use courseware_core::course::ValidationError;
use courseware_core::storage::{repository_error_to_status_code, RepositoryError};

use crate::services::ServiceError;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

pub struct AppError(pub anyhow::Error);

fn auth_error_to_status_code(error: &AuthError) -> StatusCode {
    match error {
        AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
        AuthError::MissingToken
        | AuthError::InvalidCredentials
        | AuthError::InvalidToken(_)
        | AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
        AuthError::Forbidden => StatusCode::FORBIDDEN,
        AuthError::Issue(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn cache_error_to_status_code(error: &CacheError) -> StatusCode {
    match error {
        CacheError::ConnectionFailed(_)
        | CacheError::OperationFailed(_)
        | CacheError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
        CacheError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
        CacheError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn repository_status(error: &RepositoryError) -> StatusCode {
    StatusCode::from_u16(repository_error_to_status_code(error))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        let error = &self.0;
        if let Some(service) = error.downcast_ref::<ServiceError>() {
            return match service {
                ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                ServiceError::Repository(e) => repository_status(e),
                ServiceError::Auth(e) => auth_error_to_status_code(e),
            };
        }
        if error.downcast_ref::<ValidationError>().is_some() {
            return StatusCode::BAD_REQUEST;
        }
        if let Some(e) = error.downcast_ref::<RepositoryError>() {
            return repository_status(e);
        }
        if let Some(e) = error.downcast_ref::<AuthError>() {
            return auth_error_to_status_code(e);
        }
        if let Some(e) = error.downcast_ref::<CacheError>() {
            return cache_error_to_status_code(e);
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn error_kind(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "Validation failed",
        StatusCode::UNAUTHORIZED => "Authentication required",
        StatusCode::FORBIDDEN => "Forbidden",
        StatusCode::NOT_FOUND => "Not found",
        StatusCode::CONFLICT => "Conflict",
        StatusCode::SERVICE_UNAVAILABLE => "Service unavailable",
        StatusCode::NOT_IMPLEMENTED => "Not implemented",
        _ => "Internal server error",
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }

        let body = ErrorBody {
            error: error_kind(status_code),
            message: self.0.to_string(),
        };
        (status_code, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
