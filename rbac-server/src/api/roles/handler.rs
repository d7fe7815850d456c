//! Role API Handlers

use axum::Json;
use axum::extract::{Path, State};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Role, RolePermissionsUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, role};
use crate::security_log;

/// GET /roles
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Role>>> {
    Ok(Json(role::find_all(state.pool()).await?))
}

/// GET /roles/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Role>> {
    let role = role::find_with_permissions(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RoleNotFound))?;
    Ok(Json(role))
}

/// PUT /roles/{id}/permissions
///
/// Replaces the whole set. Takes effect on the next request of every
/// holder of the role; issued access tokens are not touched.
pub async fn update_role_permissions(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<RolePermissionsUpdate>,
) -> AppResult<Json<Role>> {
    let role = role::replace_permissions(state.pool(), id, &req.permission_ids)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => AppError::new(ErrorCode::RoleNotFound),
            other => other.into(),
        })?;

    security_log!(
        "INFO",
        "role_permissions_replaced",
        role_id = id,
        count = role.permissions.len(),
        actor = current_user.username.as_str()
    );
    Ok(Json(role))
}
