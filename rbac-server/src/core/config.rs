use crate::auth::JwtConfig;
use crate::core::ServerError;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_PATH | rbac.db | SQLite 文件 (`:memory:` 为内存库) |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 / tracing 过滤器 |
/// | LOG_DIR | - | 滚动日志目录 |
/// | JWT_* | 见 [`JwtConfig::from_env`] | 访问令牌配置 |
/// | REFRESH_TOKEN_EXPIRATION_DAYS | 7 | 刷新令牌有效期 (天) |
/// | REFRESH_SWEEP_INTERVAL_SECS | 3600 | 过期刷新令牌清理间隔，0 关闭 |
/// | ADMIN_NAME | admin | 初始管理员用户名 |
/// | ADMIN_PASSWORD | - | 初始管理员密码，未设置则不创建 |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 DATABASE_PATH=/data/rbac.db cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SQLite 数据库路径
    pub database_path: String,
    /// 运行环境: development | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 日志目录 (可选)
    pub log_dir: Option<String>,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 刷新令牌有效期 (天)
    pub refresh_token_expiration_days: i64,
    /// 过期刷新令牌清理间隔 (秒)
    pub refresh_sweep_interval_secs: u64,
    /// 初始管理员用户名
    pub admin_name: String,
    /// 初始管理员密码
    pub admin_password: Option<String>,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的项使用默认值；只有 JWT 密钥不合法时报错。
    pub fn from_env() -> Result<Self, ServerError> {
        let jwt = JwtConfig::from_env().map_err(|e| ServerError::Config(e.to_string()))?;

        Ok(Self {
            http_port: env_or("HTTP_PORT", 3000),
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "rbac.db".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            jwt,
            refresh_token_expiration_days: env_or("REFRESH_TOKEN_EXPIRATION_DAYS", 7),
            refresh_sweep_interval_secs: env_or("REFRESH_SWEEP_INTERVAL_SECS", 3600),
            admin_name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "admin".into()),
            admin_password: std::env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
        })
    }

    /// 不读取环境变量的配置 (内存数据库)
    ///
    /// 常用于测试场景
    pub fn with_jwt(jwt: JwtConfig) -> Self {
        Self {
            http_port: 0,
            database_path: ":memory:".into(),
            environment: "development".into(),
            log_level: "info".into(),
            log_dir: None,
            jwt,
            refresh_token_expiration_days: 7,
            refresh_sweep_interval_secs: 0,
            admin_name: "admin".into(),
            admin_password: None,
        }
    }

    /// 刷新令牌有效期
    pub fn refresh_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.refresh_token_expiration_days)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_jwt_defaults() {
        let config = Config::with_jwt(JwtConfig::with_secret("x".repeat(32)));
        assert_eq!(config.database_path, ":memory:");
        assert_eq!(config.refresh_ttl(), chrono::Duration::days(7));
        assert_eq!(config.jwt.expiration_minutes, 15);
        assert!(!config.is_production());
        assert!(config.admin_password.is_none());
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        // SAFETY: test-local variable name, not read elsewhere
        unsafe { std::env::set_var("RBAC_TEST_BAD_PORT", "not-a-number") };
        assert_eq!(env_or("RBAC_TEST_BAD_PORT", 3000u16), 3000);
        assert_eq!(env_or("RBAC_TEST_UNSET_VALUE", 7i64), 7);
    }
}
