//! 错误定义模块

use thiserror::Error;

/// 患者记录系统统一错误类型
#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库连接不可用")]
    ConnectionUnavailable,

    #[error("数据库错误: {0}")]
    Database(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("缺少必填字段: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("字段无效: {field} ({reason})")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    #[error("网络错误: {0}")]
    Network(#[from] std::io::Error),

    #[error("系统内部错误: {0}")]
    Internal(String),
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for ClinicError {
    fn from(err: sqlx::Error) -> Self {
        ClinicError::Database(err.to_string())
    }
}

impl From<::config::ConfigError> for ClinicError {
    fn from(err: ::config::ConfigError) -> Self {
        ClinicError::Config(err.to_string())
    }
}

/// 统一结果类型
pub type Result<T> = std::result::Result<T, ClinicError>;
