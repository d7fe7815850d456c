//! 认证授权模块
//!
//! - [`JwtService`] - 访问令牌签发与验证
//! - [`PasswordHasher`] - 密码哈希 (Argon2id)
//! - [`CurrentUser`] - 当前用户上下文
//! - [`require_auth`] - 认证中间件
//! - [`enforce_route_access`] - 路由权限守卫
//! - [`PermissionEnforcer`] - 基于角色的权限判定

pub mod enforcer;
pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod permissions;

pub use enforcer::PermissionEnforcer;
pub use jwt::{Claims, CurrentUser, IdentityClaims, JwtConfig, JwtError, JwtService, TokenError};
pub use middleware::{enforce_route_access, require_auth};
pub use password::{Argon2Hasher, PasswordHasher};
pub use permissions::{Access, ROUTE_ACCESS};
