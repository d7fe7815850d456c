//! 工具模块 - 日志初始化和请求校验

pub mod logger;
pub mod validation;

pub use validation::FieldErrors;
