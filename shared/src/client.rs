//! Client-related types shared between server and client
//!
//! Request/response bodies of the `/auth` and `/profile` endpoints.
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
///
/// Both fields are optional at the deserialization layer so that a missing
/// field surfaces as a 422 validation error instead of a JSON rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Refresh request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Logout request (refresh token is optional, bearer token may be used instead)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

/// Login / refresh response data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Access token (JWT)
    pub token: String,
    /// Opaque refresh token
    pub refresh_token: String,
    pub user: UserSummary,
}

/// Identity summary returned with a fresh token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub role_id: i64,
    pub role_name: String,
}

/// Current identity as seen by the access token (`GET /auth/me`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    /// Login name (`sub` claim)
    pub name: String,
    pub display_name: String,
    pub role_id: i64,
    /// Access token expiry (Unix seconds)
    pub expires_at: i64,
}

// =============================================================================
// Profile API DTOs
// =============================================================================

/// Change password request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_missing_fields() {
        let req: LoginRequest = serde_json::from_str("{}").unwrap();
        assert!(req.name.is_none());
        assert!(req.password.is_none());
    }

    #[test]
    fn test_refresh_request_null_token() {
        let req: RefreshRequest = serde_json::from_str(r#"{"refreshToken":null}"#).unwrap();
        assert!(req.refresh_token.is_none());
    }

    #[test]
    fn test_login_response_camel_case() {
        let resp = LoginResponse {
            token: "t".into(),
            refresh_token: "r".into(),
            user: UserSummary {
                id: 1,
                name: "admin".into(),
                role_id: 1,
                role_name: "ADMIN".into(),
            },
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["refreshToken"], "r");
        assert_eq!(json["user"]["roleId"], 1);
        assert_eq!(json["user"]["roleName"], "ADMIN");
    }
}
