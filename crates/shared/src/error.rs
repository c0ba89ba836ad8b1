//! 基础设施错误类型
//!
//! 覆盖配置加载、数据库连接等启动阶段的错误，业务错误由各服务自行定义。

use thiserror::Error;

use crate::config::ConfigValidationError;

/// 基础设施错误
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("数据库错误: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("配置加载失败: {0}")]
    Config(#[from] config::ConfigError),

    #[error("配置校验失败: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    #[error("数据库连接超时: {seconds}s")]
    ConnectTimeout { seconds: u64 },
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, InfraError>;

impl InfraError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ConnectTimeout { .. } => "CONNECT_TIMEOUT",
        }
    }

    /// 是否为可重试错误
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_) | Self::ConnectTimeout { .. })
    }
}
