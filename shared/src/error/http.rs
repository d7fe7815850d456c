//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::UserNotFound | Self::RoleNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::InvalidRefreshToken => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied => StatusCode::FORBIDDEN,

            // 422 Unprocessable Entity (missing / blank request fields)
            Self::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
        }
    }
}
