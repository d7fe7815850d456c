//! Shared types for the RBAC server
//!
//! Error codes and response envelope, domain models and the request/response
//! bodies exchanged with API clients.

pub mod client;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
