//! Role API Module

mod handler;

use axum::{Router, routing::get, routing::put};

use crate::core::ServerState;

/// Role router - (READ|UPDATE, ROLE)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/roles", get(handler::list))
        .route("/roles/{id}", get(handler::get_by_id))
        .route("/roles/{id}/permissions", put(handler::update_role_permissions))
}
