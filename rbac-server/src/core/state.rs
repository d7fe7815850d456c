use std::sync::Arc;

use crate::auth::{Argon2Hasher, JwtService, PasswordHasher, PermissionEnforcer};
use crate::core::{BackgroundTasks, Config, Result, ServerError};
use crate::db::DbService;
use crate::db::repository::{RefreshTokenRepository, RoleRepository, UserDirectory, UserRepository};
use crate::services::{AuthSessionService, CredentialAuthenticator, RefreshTokenSweeper};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有字段都是 `Arc` 或内部持有连接池句柄，Clone 成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | 访问令牌签发/校验 |
/// | hasher | Arc<dyn PasswordHasher> | 密码哈希 |
/// | auth_session | AuthSessionService | 登录/刷新/登出 |
/// | enforcer | PermissionEnforcer | 权限检查 |
/// | refresh_tokens | RefreshTokenRepository | 刷新令牌存储 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub auth_session: AuthSessionService,
    pub enforcer: PermissionEnforcer,
    pub refresh_tokens: RefreshTokenRepository,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 打开数据库 (执行迁移)，再按依赖顺序组装各服务。
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_path)
            .await
            .map_err(|e| ServerError::Database(e.message))?;

        Ok(Self::with_db(config, db))
    }

    /// 在已打开的数据库上组装服务
    pub fn with_db(config: &Config, db: DbService) -> Self {
        let pool = db.pool.clone();
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher);
        let users: Arc<dyn UserDirectory> = Arc::new(UserRepository::new(pool.clone()));
        let refresh_tokens = RefreshTokenRepository::new(pool.clone());

        let auth_session = AuthSessionService::new(
            jwt_service.clone(),
            CredentialAuthenticator::new(users.clone(), hasher.clone()),
            refresh_tokens.clone(),
            users,
            config.refresh_ttl(),
        );
        let enforcer = PermissionEnforcer::new(Arc::new(RoleRepository::new(pool)));

        Self {
            config: config.clone(),
            db,
            jwt_service,
            hasher,
            auth_session,
            enforcer,
            refresh_tokens,
        }
    }

    /// 数据库连接池
    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.db.pool
    }

    /// 启动后台任务
    ///
    /// `refresh_sweep_interval_secs == 0` 时不注册清理任务。
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let interval = self.config.refresh_sweep_interval_secs;
        if interval > 0 {
            let sweeper = RefreshTokenSweeper::new(
                self.refresh_tokens.clone(),
                std::time::Duration::from_secs(interval),
                tasks.shutdown_token(),
            );
            tasks.spawn("refresh_token_sweeper", sweeper.run());
        }

        tasks.log_summary();
        tasks
    }
}
