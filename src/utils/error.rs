//! KPicture 错误处理模块
//!
//! 定义引擎错误类型

use serde::Serialize;
use thiserror::Error;

/// 引擎错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 数据库错误
    #[error("数据库错误: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 参数无效（配置阶段立即抛出）
    #[error("参数无效: {0}")]
    InvalidArgument(String),

    /// 路径无效
    #[error("路径无效: {0}")]
    InvalidPath(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 后台任务失败
    #[error("后台任务失败: {0}")]
    Task(String),

    /// 通用错误
    #[error("{0}")]
    General(String),
}

/// 用于 C ABI 返回的错误包装
#[derive(Debug, Serialize)]
pub struct CommandError {
    pub code: String,
    pub message: String,
}

impl From<AppError> for CommandError {
    fn from(err: AppError) -> Self {
        let code = match &err {
            AppError::Database(_) => "E_DB_ERROR",
            AppError::Io(_) => "E_IO_ERROR",
            AppError::Serialization(_) => "E_SERIALIZATION",
            AppError::InvalidArgument(_) => "E_INVALID_ARGUMENT",
            AppError::InvalidPath(_) => "E_PATH_INVALID",
            AppError::Config(_) => "E_CONFIG",
            AppError::Task(_) => "E_TASK_FAILED",
            AppError::General(_) => "E_GENERAL",
        };

        CommandError {
            code: code.to_string(),
            message: err.to_string(),
        }
    }
}

/// 引擎结果类型别名
pub type AppResult<T> = Result<T, AppError>;
