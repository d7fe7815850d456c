//! Route access table
//!
//! Every protected route is listed here with what it requires. The
//! [`enforce_route_access`](super::middleware::enforce_route_access) guard
//! denies any protected route that has no entry.

use http::Method;
use shared::models::{PermissionName, PermissionScope};

use Access::{Authenticated, Permission};
use PermissionName::{Delete, Read, Update};
use PermissionScope::{Permission as PermissionScopeItem, Profile, Role, User};

/// Requirement of one route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any valid access token
    Authenticated,
    /// Role must hold exactly this `(name, scope)` pair
    Permission(PermissionName, PermissionScope),
}

/// `(method, matched path)` → requirement
#[derive(Debug, Clone, Copy)]
pub struct RouteAccess {
    pub method: &'static str,
    pub path: &'static str,
    pub access: Access,
}

#[rustfmt::skip]
pub const ROUTE_ACCESS: &[RouteAccess] = &[
    // === Session ===
    RouteAccess { method: "GET", path: "/auth/me", access: Authenticated },
    // === Profile ===
    RouteAccess { method: "GET", path: "/profile", access: Permission(Read, Profile) },
    RouteAccess { method: "PUT", path: "/profile/password", access: Permission(Update, Profile) },
    // === Users ===
    RouteAccess { method: "GET", path: "/users", access: Permission(Read, User) },
    RouteAccess { method: "GET", path: "/users/{id}", access: Permission(Read, User) },
    RouteAccess { method: "DELETE", path: "/users/{id}", access: Permission(Delete, User) },
    // === Roles ===
    RouteAccess { method: "GET", path: "/roles", access: Permission(Read, Role) },
    RouteAccess { method: "GET", path: "/roles/{id}", access: Permission(Read, Role) },
    RouteAccess { method: "PUT", path: "/roles/{id}/permissions", access: Permission(Update, Role) },
    // === Permissions ===
    RouteAccess { method: "GET", path: "/permissions", access: Permission(Read, PermissionScopeItem) },
];

/// Requirement for a matched route, `None` when the route is not listed
pub fn lookup(method: &Method, path: &str) -> Option<Access> {
    ROUTE_ACCESS
        .iter()
        .find(|r| r.method == method.as_str() && r.path == path)
        .map(|r| r.access)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lookup() {
        assert_eq!(lookup(&Method::GET, "/auth/me"), Some(Authenticated));
        assert_eq!(
            lookup(&Method::DELETE, "/users/{id}"),
            Some(Permission(Delete, User))
        );
        assert_eq!(
            lookup(&Method::PUT, "/roles/{id}/permissions"),
            Some(Permission(Update, Role))
        );
    }

    #[test]
    fn test_unlisted_routes() {
        assert_eq!(lookup(&Method::POST, "/users"), None);
        assert_eq!(lookup(&Method::GET, "/users/42"), None);
        assert_eq!(lookup(&Method::GET, "/auth/login"), None);
    }

    #[test]
    fn test_no_duplicate_entries() {
        let mut seen = HashSet::new();
        for entry in ROUTE_ACCESS {
            assert!(seen.insert((entry.method, entry.path)), "{} {}", entry.method, entry.path);
        }
    }
}
