//! User API Handlers

use axum::Json;
use axum::extract::{Path, State};
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::User;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;

/// GET /users
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    let users = user::find_all(state.pool()).await?;
    Ok(Json(users.iter().map(|u| u.to_public()).collect()))
}

/// GET /users/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    let record = user::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(record.to_public()))
}

/// DELETE /users/{id}
///
/// The refresh token goes first; the cascade would drop it anyway, but an
/// explicit revoke keeps the session end visible in the log.
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    let revoked = state.refresh_tokens.revoke_for(id).await?;

    if !user::delete(state.pool(), id).await? {
        return Err(AppError::new(ErrorCode::UserNotFound));
    }

    security_log!(
        "INFO",
        "user_deleted",
        user_id = id,
        revoked = revoked,
        actor = current_user.username.as_str()
    );
    Ok(ApiResponse::ok())
}
