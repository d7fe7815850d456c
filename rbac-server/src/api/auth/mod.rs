//! Authentication Routes

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

/// Public routes - no auth middleware applied
///
/// `/auth/logout` reads an optional bearer itself; an expired access
/// token is still good enough to log out.
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/auth/login", post(handler::login))
        .route("/auth/refresh", post(handler::refresh))
        .route("/auth/logout", post(handler::logout))
}

/// Protected routes - merged under the require_auth layer
pub fn protected_router() -> Router<ServerState> {
    Router::new().route("/auth/me", get(handler::me))
}
