//! User Model

use serde::{Deserialize, Serialize};

use super::Status;

/// User as exposed through the API (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub role_id: i64,
    pub role_name: String,
    pub status: Status,
    pub created_at: i64,
    pub updated_at: i64,
}
