//! User API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// User router - (READ|DELETE, USER)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/users", get(handler::list))
        .route("/users/{id}", get(handler::get_by_id).delete(handler::delete))
}
