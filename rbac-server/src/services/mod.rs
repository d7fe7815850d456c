//! 服务层 - 认证会话相关服务
//!
//! # 服务列表
//!
//! - [`CredentialAuthenticator`] - 用户名/密码校验
//! - [`AuthSessionService`] - 登录、刷新令牌轮换、登出
//! - [`RefreshTokenSweeper`] - 过期刷新令牌定时清理

pub mod auth_session;
pub mod credential;
pub mod refresh_sweeper;

pub use auth_session::AuthSessionService;
pub use credential::{AuthError, CredentialAuthenticator, UserIdentity};
pub use refresh_sweeper::RefreshTokenSweeper;
