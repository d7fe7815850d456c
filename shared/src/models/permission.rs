//! Permission Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Status;

/// 权限动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PermissionName {
    Create,
    Read,
    Update,
    Delete,
}

/// 权限作用的资源类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PermissionScope {
    User,
    Role,
    Permission,
    Profile,
}

impl PermissionName {
    pub const ALL: [PermissionName; 4] = [Self::Create, Self::Read, Self::Update, Self::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl PermissionScope {
    pub const ALL: [PermissionScope; 4] = [Self::User, Self::Role, Self::Permission, Self::Profile];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Role => "ROLE",
            Self::Permission => "PERMISSION",
            Self::Profile => "PROFILE",
        }
    }
}

/// Error returned when a stored permission name or scope is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission {kind}: {value}")]
pub struct ParsePermissionError {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for PermissionName {
    type Err = ParsePermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(Self::Create),
            "READ" => Ok(Self::Read),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            other => Err(ParsePermissionError {
                kind: "name",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for PermissionScope {
    type Err = ParsePermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "ROLE" => Ok(Self::Role),
            "PERMISSION" => Ok(Self::Permission),
            "PROFILE" => Ok(Self::Profile),
            other => Err(ParsePermissionError {
                kind: "scope",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PermissionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PermissionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission entity
///
/// Authorization compares the `(name, scope)` pair only; `id` and `status`
/// never take part in the decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    pub name: PermissionName,
    pub scope: PermissionScope,
    pub status: Status,
}

impl Permission {
    /// Whether this permission grants `(name, scope)`
    pub fn grants(&self, name: PermissionName, scope: PermissionScope) -> bool {
        self.name == name && self.scope == scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip_names() {
        for name in PermissionName::ALL {
            assert_eq!(name.as_str().parse::<PermissionName>().unwrap(), name);
        }
        for scope in PermissionScope::ALL {
            assert_eq!(scope.as_str().parse::<PermissionScope>().unwrap(), scope);
        }
    }

    #[test]
    fn test_parse_rejects_lowercase() {
        let err = "read".parse::<PermissionName>().unwrap_err();
        assert_eq!(err.kind, "name");
        assert!("profile".parse::<PermissionScope>().is_err());
    }

    #[test]
    fn test_grants_ignores_status() {
        let perm = Permission {
            id: 7,
            name: PermissionName::Update,
            scope: PermissionScope::Role,
            status: Status::Inactive,
        };
        assert!(perm.grants(PermissionName::Update, PermissionScope::Role));
        assert!(!perm.grants(PermissionName::Update, PermissionScope::User));
        assert!(!perm.grants(PermissionName::Read, PermissionScope::Role));
    }

    #[test]
    fn test_serialize_uppercase() {
        let json = serde_json::to_string(&PermissionScope::Profile).unwrap();
        assert_eq!(json, "\"PROFILE\"");
    }
}
