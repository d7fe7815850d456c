//! 凭证认证
//!
//! 用户名 + 密码 → [`UserIdentity`]。
//! 用户不存在和密码错误返回同一个错误，且两条路径都执行一次完整的 Argon2 校验。

use std::sync::Arc;

use shared::error::AppError;
use thiserror::Error;

use crate::auth::{PasswordHasher, TokenError};
use crate::db::repository::{RepoError, UserDirectory};
use crate::security_log;

/// Well-formed Argon2id PHC string (default parameters) that matches no password
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Authenticated identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub role_id: i64,
    pub role_name: String,
}

/// Authentication / session errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error(transparent)]
    Repository(#[from] RepoError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::invalid_credentials(),
            AuthError::InvalidRefreshToken => AppError::invalid_refresh_token(),
            AuthError::Repository(e) => e.into(),
            AuthError::Token(e) => AppError::internal(format!("Failed to issue token: {e}")),
        }
    }
}

/// Verifies a username/password pair against the user directory
#[derive(Clone)]
pub struct CredentialAuthenticator {
    users: Arc<dyn UserDirectory>,
    hasher: Arc<dyn PasswordHasher>,
}

impl CredentialAuthenticator {
    pub fn new(users: Arc<dyn UserDirectory>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Inactive users and users of an inactive role are rejected like a wrong password.
    pub async fn authenticate(&self, name: &str, password: &str) -> Result<UserIdentity, AuthError> {
        let Some(user) = self.users.find_by_name(name).await? else {
            // Same cost as a real verification
            let _ = self.hasher.verify(password, DUMMY_HASH);
            security_log!("WARN", "login_failed", username = name, reason = "user_not_found");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash) {
            security_log!("WARN", "login_failed", username = name, reason = "bad_password");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.can_sign_in() {
            security_log!("WARN", "login_failed", username = name, reason = "inactive");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(UserIdentity {
            id: user.id,
            name: user.name,
            display_name: user.display_name,
            role_id: user.role_id,
            role_name: user.role_name,
        })
    }
}
