use thiserror::Error;

/// 服务器启动/运行错误
///
/// 只在进程边界使用；请求处理使用 [`shared::error::AppError`]。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库错误: {0}")]
    Database(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<shared::error::AppError> for ServerError {
    fn from(err: shared::error::AppError) -> Self {
        match err.code {
            shared::error::ErrorCode::DatabaseError => ServerError::Database(err.message),
            shared::error::ErrorCode::ConfigError => ServerError::Config(err.message),
            _ => ServerError::Internal(anyhow::anyhow!(err.message)),
        }
    }
}

/// 启动流程的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
