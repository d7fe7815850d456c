//! Role Model

use serde::{Deserialize, Serialize};

use super::{Permission, PermissionName, PermissionScope, Status};

/// Role entity (RBAC 角色) with its permission set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub status: Status,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Role {
    /// Whether any permission in the set grants exactly `(name, scope)`
    pub fn has_permission(&self, name: PermissionName, scope: PermissionScope) -> bool {
        self.permissions.iter().any(|p| p.grants(name, scope))
    }
}

/// Replace a role's permission set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePermissionsUpdate {
    pub permission_ids: Vec<i64>,
}
