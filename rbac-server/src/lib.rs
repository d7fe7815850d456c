//! RBAC Server - 用户 / 角色 / 权限服务
//!
//! # 架构概述
//!
//! - **认证** (`auth`): JWT 访问令牌 + Argon2 密码哈希 + 路由权限表
//! - **会话** (`services`): 登录、刷新令牌轮换、登出、过期令牌清理
//! - **数据库** (`db`): SQLite (sqlx) 连接池、迁移、仓储
//! - **HTTP API** (`api`): axum 路由和处理器
//!
//! # 模块结构
//!
//! ```text
//! rbac-server/src/
//! ├── core/          # 配置、状态、错误、后台任务
//! ├── auth/          # JWT、密码、权限表、中间件
//! ├── services/      # 凭证校验、会话、清理任务
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 日志、校验
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境：加载 `.env`，初始化日志
///
/// 日志相关变量在 [`Config`] 之前读取，配置加载失败也能留下日志。
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    // .env 不存在不是错误
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty());
    let json = std::env::var("LOG_JSON").is_ok_and(|v| v == "1" || v == "true");

    init_logger_with_file(log_level.as_deref(), json, log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____  ____  ___   ______
   / __ \/ __ )/   | / ____/
  / /_/ / __  / /| |/ /
 / _, _/ /_/ / ___ / /___
/_/ |_/_____/_/  |_\____/
    "#
    );
}
