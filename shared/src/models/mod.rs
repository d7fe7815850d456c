//! Data models
//!
//! Shared between the server and API clients.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix milliseconds.

pub mod permission;
pub mod role;
pub mod user;

pub use permission::*;
pub use role::*;
pub use user::*;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 实体状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl FromStr for Status {
    type Err = ParsePermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            other => Err(ParsePermissionError {
                kind: "status",
                value: other.to_string(),
            }),
        }
    }
}
