use thiserror::Error;

use courseware_core::auth::AuthError;
use courseware_core::course::ValidationError;
use courseware_core::storage::RepositoryError;

/// Errors returned by the service layer.
///
/// Cache failures never show up here: the cache-aside layer absorbs them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
