//! Admin login.

use std::sync::Arc;

use tracing::{info, warn};

use courseware_core::auth::{
    constant_time_eq, AuthError, Authenticator, LoginRequest, LoginResponse, Principal,
};

use super::error::Result;

/// The single administrator account, read from configuration.
#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub struct AuthService {
    authenticator: Arc<dyn Authenticator>,
    admin: AdminCredentials,
}

impl AuthService {
    pub fn new(authenticator: Arc<dyn Authenticator>, admin: AdminCredentials) -> Self {
        Self {
            authenticator,
            admin,
        }
    }

    pub fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        let username = request.username.trim();
        if username.is_empty() || request.password.is_empty() {
            return Err(AuthError::MissingCredentials.into());
        }

        let username_ok = constant_time_eq(username, &self.admin.username);
        let password_ok = constant_time_eq(&request.password, &self.admin.password);
        if !(username_ok && password_ok) {
            warn!(username = %username, "Rejected login");
            return Err(AuthError::InvalidCredentials.into());
        }

        let user = Principal::admin(username);
        let token = self.authenticator.issue(&user)?;

        info!(username = %username, "Admin logged in");
        Ok(LoginResponse { token, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{JwtAuthenticator, DEFAULT_TOKEN_TTL};
    use crate::services::ServiceError;

    fn service() -> (AuthService, Arc<JwtAuthenticator>) {
        let jwt = Arc::new(JwtAuthenticator::new("secret", DEFAULT_TOKEN_TTL));
        let service = AuthService::new(
            jwt.clone(),
            AdminCredentials {
                username: "admin".to_string(),
                password: "s3cret".to_string(),
            },
        );
        (service, jwt)
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_login_issues_admin_token() {
        let (service, jwt) = service();

        let response = service.login(&login("admin", "s3cret")).unwrap();

        assert!(response.user.is_admin());
        assert_eq!(jwt.authenticate(&response.token).unwrap(), response.user);
    }

    #[test]
    fn test_login_rejects_wrong_password() {
        let (service, _) = service();
        assert_eq!(
            service.login(&login("admin", "nope")).unwrap_err(),
            ServiceError::Auth(AuthError::InvalidCredentials)
        );
        assert_eq!(
            service.login(&login("root", "s3cret")).unwrap_err(),
            ServiceError::Auth(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_login_requires_both_fields() {
        let (service, _) = service();
        assert_eq!(
            service.login(&login(" ", "s3cret")).unwrap_err(),
            ServiceError::Auth(AuthError::MissingCredentials)
        );
        assert_eq!(
            service.login(&login("admin", "")).unwrap_err(),
            ServiceError::Auth(AuthError::MissingCredentials)
        );
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = AdminCredentials {
            username: "admin".to_string(),
            password: "s3cret".to_string(),
        };
        assert!(!format!("{credentials:?}").contains("s3cret"));
    }
}
