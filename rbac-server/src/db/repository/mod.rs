//! Repository Module
//!
//! SQLite access for users, roles, permissions and refresh tokens.
//! Query helpers are free functions over `&SqlitePool`; the repository
//! structs wrap a pool and implement the lookup traits the auth services depend on.

pub mod permission;
pub mod refresh_token;
pub mod role;
pub mod user;

// Re-exports
pub use refresh_token::{RefreshToken, RefreshTokenRepository};
pub use role::{RoleDirectory, RoleRepository};
pub use user::{UserDirectory, UserRecord, UserRepository};

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Parse a TEXT enum column, reporting corrupt rows as database errors
pub(crate) fn parse_column<T: std::str::FromStr>(value: &str, column: &str) -> RepoResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| RepoError::Database(format!("Invalid {column} column: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_error_to_app_error() {
        let err: AppError = RepoError::NotFound("User 7 not found".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "User 7 not found");

        let err: AppError = RepoError::Database("disk full".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn test_parse_column() {
        let status: shared::models::Status = parse_column("ACTIVE", "status").unwrap();
        assert!(status.is_active());
        assert!(matches!(
            parse_column::<shared::models::Status>("gone", "status"),
            Err(RepoError::Database(_))
        ));
    }
}
