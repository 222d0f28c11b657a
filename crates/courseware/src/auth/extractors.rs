//! Axum extractors for bearer-token authentication.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use courseware_core::auth::{parse_bearer, AuthError, Authenticator, Principal};

use crate::handlers::AppError;

/// State needed by the auth extractors.
#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<dyn Authenticator>,
}

/// Extractor for an authenticated caller. Returns 401 if the bearer token is
/// missing or invalid.
pub struct CurrentUser(pub Principal);

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_bearer)
            .ok_or(AuthError::MissingToken)?;

        let principal = auth_state.authenticator.authenticate(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            e
        })?;

        Ok(CurrentUser(principal))
    }
}

/// Extractor for an administrator. Returns 401 like [`CurrentUser`], and 403
/// when the caller is authenticated but not an admin.
pub struct AdminUser(pub Principal);

impl<S> FromRequestParts<S> for AdminUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(principal) = CurrentUser::from_request_parts(parts, state).await?;

        if !principal.is_admin() {
            tracing::warn!(subject = %principal.subject, "Non-admin caller on admin route");
            return Err(AuthError::Forbidden.into());
        }

        Ok(AdminUser(principal))
    }
}
