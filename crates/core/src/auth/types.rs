use serde::{Deserialize, Serialize};

/// Role carried by an authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Stable identifier, used as the token subject.
    pub subject: String,
    pub username: String,
    pub role: Role,
}

impl Principal {
    pub fn admin(username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            subject: username.clone(),
            username,
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Principal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_principal() {
        let principal = Principal::admin("admin");
        assert!(principal.is_admin());
        assert_eq!(principal.subject, "admin");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"student\"").unwrap(),
            Role::Student
        );
    }
}
