//! Authentication Handlers
//!
//! Handles login, refresh rotation, logout and identity lookup

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use axum::{Json, extract::State};
use shared::client::{
    CurrentUserResponse, LoginRequest, LoginResponse, LogoutRequest, RefreshRequest,
};
use shared::error::{ApiResponse, AppError, AppResult};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::utils::FieldErrors;
use crate::utils::validation::{MAX_NAME_LEN, MAX_PASSWORD_LEN};

/// POST /auth/login
///
/// Unknown user, wrong password and inactive account share one 401.
/// A body that is not a login object is a 422 like a missing field.
pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(req) = payload.map_err(|e| AppError::validation(e.body_text()))?;

    let mut errors = FieldErrors::new();
    let name = errors.require(req.name.as_deref(), "name", MAX_NAME_LEN);
    let password = errors.require(req.password.as_deref(), "password", MAX_PASSWORD_LEN);
    errors.finish()?;

    let response = state
        .auth_session
        .login(name, password)
        .await
        .map_err(AppError::from)?;
    Ok(Json(response))
}

/// POST /auth/refresh
///
/// Missing body, non-JSON body and absent token all end up as
/// `Invalid refresh token`.
pub async fn refresh(
    State(state): State<ServerState>,
    body: Bytes,
) -> AppResult<Json<LoginResponse>> {
    let req: RefreshRequest = serde_json::from_slice(&body).unwrap_or_default();
    let presented = req.refresh_token.as_deref().unwrap_or_default();

    let response = state
        .auth_session
        .refresh(presented)
        .await
        .map_err(AppError::from)?;
    Ok(Json(response))
}

/// POST /auth/logout
///
/// Body and bearer are both optional. Always 200 unless the store fails.
pub async fn logout(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<ApiResponse<()>> {
    let req: LogoutRequest = serde_json::from_slice(&body).unwrap_or_default();

    let bearer = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header);

    state
        .auth_session
        .logout(req.refresh_token.as_deref(), bearer)
        .await
        .map_err(AppError::from)?;
    Ok(ApiResponse::ok())
}

/// GET /auth/me
pub async fn me(user: CurrentUser) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse {
        name: user.username,
        display_name: user.display_name,
        role_id: user.role_id,
        expires_at: user.expires_at,
    })
}
