//! Permission API Module

use axum::extract::State;
use axum::{Json, Router, routing::get};
use shared::error::AppResult;
use shared::models::Permission;

use crate::core::ServerState;
use crate::db::repository::permission;

/// Permission router - (READ, PERMISSION)
pub fn router() -> Router<ServerState> {
    Router::new().route("/permissions", get(list))
}

/// GET /permissions
async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Permission>>> {
    Ok(Json(permission::find_all(state.pool()).await?))
}
