//! Profile API Handlers

use axum::Json;
use axum::extract::State;
use shared::client::ChangePasswordRequest;
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::User;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{UserRecord, user};
use crate::security_log;
use crate::utils::FieldErrors;
use crate::utils::validation::MAX_PASSWORD_LEN;

async fn load(state: &ServerState, current_user: &CurrentUser) -> AppResult<UserRecord> {
    user::find_by_name(state.pool(), &current_user.username)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))
}

/// GET /profile
pub async fn get(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<User>> {
    Ok(Json(load(&state, &current_user).await?.to_public()))
}

/// PUT /profile/password
///
/// 成功后撤销自己的刷新令牌，其他会话需要重新登录。
pub async fn change_password(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    let mut errors = FieldErrors::new();
    let current = errors.require(
        req.current_password.as_deref(),
        "currentPassword",
        MAX_PASSWORD_LEN,
    );
    let new = errors.require(req.new_password.as_deref(), "newPassword", MAX_PASSWORD_LEN);
    errors.finish()?;

    let record = load(&state, &current_user).await?;
    if !state.hasher.verify(current, &record.password_hash) {
        security_log!(
            "WARN",
            "password_change_failed",
            user_id = record.id,
            reason = "bad_password"
        );
        return Err(AppError::invalid_credentials());
    }

    let hash = state
        .hasher
        .hash(new)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
    user::update_password(state.pool(), record.id, &hash).await?;
    let revoked = state.refresh_tokens.revoke_for(record.id).await?;

    security_log!("INFO", "password_changed", user_id = record.id, revoked = revoked);
    Ok(ApiResponse::ok())
}
