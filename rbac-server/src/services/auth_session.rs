//! 会话服务：登录、刷新令牌轮换、登出
//!
//! 刷新令牌的创建和替换只经过这里；删除用户时只调用
//! [`RefreshTokenRepository::revoke_for`]。

use std::sync::Arc;

use chrono::Duration;
use serde_json::Value;
use shared::client::{LoginResponse, UserSummary};

use crate::auth::{IdentityClaims, JwtService};
use crate::db::repository::{RefreshTokenRepository, UserDirectory};
use crate::security_log;

use super::credential::{AuthError, CredentialAuthenticator, UserIdentity};

/// Login / refresh / logout orchestration
#[derive(Clone)]
pub struct AuthSessionService {
    jwt: Arc<JwtService>,
    authenticator: CredentialAuthenticator,
    refresh_tokens: RefreshTokenRepository,
    users: Arc<dyn UserDirectory>,
    refresh_ttl: Duration,
}

impl AuthSessionService {
    pub fn new(
        jwt: Arc<JwtService>,
        authenticator: CredentialAuthenticator,
        refresh_tokens: RefreshTokenRepository,
        users: Arc<dyn UserDirectory>,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            jwt,
            authenticator,
            refresh_tokens,
            users,
            refresh_ttl,
        }
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Authenticate and hand out a fresh token pair
    pub async fn login(&self, name: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let identity = self.authenticator.authenticate(name, password).await?;

        let token = self.issue_access_token(&identity)?;
        let refresh = self
            .refresh_tokens
            .issue_for(identity.id, self.refresh_ttl)
            .await?;

        tracing::info!(
            user_id = identity.id,
            username = %identity.name,
            role = %identity.role_name,
            "User logged in successfully"
        );

        Ok(Self::response(token, refresh.token, identity))
    }

    /// Exchange a refresh token for a new pair; the presented value is consumed
    pub async fn refresh(&self, presented: &str) -> Result<LoginResponse, AuthError> {
        if presented.trim().is_empty() {
            return Err(AuthError::InvalidRefreshToken);
        }

        let Some(current) = self.refresh_tokens.find_valid(presented).await? else {
            security_log!("WARN", "refresh_rejected", reason = "unknown_or_expired");
            return Err(AuthError::InvalidRefreshToken);
        };

        let user = match self.users.find_by_id(current.user_id).await? {
            Some(user) if user.can_sign_in() => user,
            Some(_) => {
                security_log!(
                    "WARN",
                    "refresh_rejected",
                    user_id = current.user_id,
                    reason = "inactive"
                );
                return Err(AuthError::InvalidRefreshToken);
            }
            None => {
                security_log!(
                    "WARN",
                    "refresh_rejected",
                    user_id = current.user_id,
                    reason = "owner_missing"
                );
                return Err(AuthError::InvalidRefreshToken);
            }
        };

        let Some(rotated) = self
            .refresh_tokens
            .rotate(presented, user.id, self.refresh_ttl)
            .await?
        else {
            security_log!(
                "WARN",
                "refresh_rejected",
                user_id = user.id,
                reason = "already_consumed"
            );
            return Err(AuthError::InvalidRefreshToken);
        };

        let identity = UserIdentity {
            id: user.id,
            name: user.name,
            display_name: user.display_name,
            role_id: user.role_id,
            role_name: user.role_name,
        };
        let token = self.issue_access_token(&identity)?;

        tracing::debug!(user_id = identity.id, "Refresh token rotated");
        Ok(Self::response(token, rotated.token, identity))
    }

    /// Revoke the presented refresh token, or the bearer's one when only an
    /// access token (possibly expired) is given. Unknown values are ignored.
    pub async fn logout(
        &self,
        refresh_token: Option<&str>,
        bearer: Option<&str>,
    ) -> Result<(), AuthError> {
        if let Some(value) = refresh_token.filter(|v| !v.trim().is_empty()) {
            let revoked = self.refresh_tokens.revoke(value).await?;
            tracing::info!(revoked, "Logout by refresh token");
            return Ok(());
        }

        let Some(bearer) = bearer else {
            return Ok(());
        };
        let Some(Value::String(subject)) = self.jwt.extract_claim(bearer, "sub") else {
            return Ok(());
        };

        if let Some(user) = self.users.find_by_name(&subject).await? {
            let revoked = self.refresh_tokens.revoke_for(user.id).await?;
            tracing::info!(user_id = user.id, revoked, "Logout by access token");
        }
        Ok(())
    }

    fn issue_access_token(&self, identity: &UserIdentity) -> Result<String, AuthError> {
        let claims = IdentityClaims {
            name: identity.display_name.clone(),
            role_id: identity.role_id,
        };
        Ok(self.jwt.issue_access_token(&identity.name, &claims)?)
    }

    fn response(token: String, refresh_token: String, identity: UserIdentity) -> LoginResponse {
        LoginResponse {
            token,
            refresh_token,
            user: UserSummary {
                id: identity.id,
                name: identity.name,
                role_id: identity.role_id,
                role_name: identity.role_name,
            },
        }
    }
}
