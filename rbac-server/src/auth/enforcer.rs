//! Permission enforcement
//!
//! Reads the caller's role live on every check, so a change to a role's
//! permission set applies from the next request on.

use std::sync::Arc;

use shared::error::AppError;
use shared::models::{PermissionName, PermissionScope};

use crate::auth::CurrentUser;
use crate::db::repository::{RepoResult, RoleDirectory};
use crate::security_log;

/// Allow/deny on `(name, scope)` pairs held by a role
#[derive(Clone)]
pub struct PermissionEnforcer {
    roles: Arc<dyn RoleDirectory>,
}

impl PermissionEnforcer {
    pub fn new(roles: Arc<dyn RoleDirectory>) -> Self {
        Self { roles }
    }

    /// `true` iff the role exists and holds exactly `(name, scope)`
    ///
    /// The permission's own status is not consulted.
    pub async fn check(
        &self,
        role_id: i64,
        name: PermissionName,
        scope: PermissionScope,
    ) -> RepoResult<bool> {
        let role = self.roles.find_with_permissions(role_id).await?;
        Ok(role.is_some_and(|r| r.has_permission(name, scope)))
    }

    /// [`check`](Self::check) as a guard: deny is 403 without naming the requirement
    pub async fn authorize(
        &self,
        user: &CurrentUser,
        name: PermissionName,
        scope: PermissionScope,
    ) -> Result<(), AppError> {
        if self.check(user.role_id, name, scope).await? {
            return Ok(());
        }

        security_log!(
            "WARN",
            "permission_denied",
            username = user.username.clone(),
            role_id = user.role_id,
            required_permission = format!("{name}:{scope}")
        );
        Err(AppError::forbidden())
    }
}
