//! Profile API Module
//!
//! The caller's own account, looked up by the `sub` claim.

mod handler;

use axum::{Router, routing::get, routing::put};

use crate::core::ServerState;

/// Profile router - (READ|UPDATE, PROFILE)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/profile", get(handler::get))
        .route("/profile/password", put(handler::change_password))
}
