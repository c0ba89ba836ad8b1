//! 存储层错误类型
//!
//! 仓储与事务编排共用一套错误。工作流失败时外层包装 `TransactionAborted`，
//! 携带工作流名、失败步骤和原始错误，形成可追溯的错误链。

use std::fmt;

use thiserror::Error;
use tournament_shared::error::InfraError;

/// 复合工作流
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    Join,
    Finish,
}

impl Workflow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::Finish => "finish",
        }
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 存储层错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("无效的标识符: {value:?}")]
    InvalidIdentifier { value: String },

    #[error("无效的数值: {field}={value}")]
    InvalidAmount { field: &'static str, value: f64 },

    #[error("记录不存在: {entity} id={id}")]
    NotFound { entity: &'static str, id: String },

    #[error("删除数量不符: {entity} id={id}, deleted={deleted}")]
    DeleteCountMismatch {
        entity: &'static str,
        id: String,
        deleted: u64,
    },

    #[error("更新数量不符: {entity}.{field} id={id}, modified={modified}")]
    UpdateCountMismatch {
        entity: &'static str,
        id: String,
        field: &'static str,
        modified: u64,
    },

    #[error("文档解析失败: {entity} id={id}: {source}")]
    DecodeFailed {
        entity: &'static str,
        id: String,
        #[source]
        source: mongodb::bson::de::Error,
    },

    #[error("读取失败: {entity}.{operation}: {source}")]
    StoreReadFailed {
        entity: &'static str,
        operation: &'static str,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("写入失败: {entity}.{operation}: {source}")]
    StoreWriteFailed {
        entity: &'static str,
        operation: &'static str,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("存储未返回可用的标识符: {entity}")]
    IdentifierAssignmentFailed { entity: &'static str },

    #[error("比赛已结束: {id}")]
    AlreadyFinished { id: String },

    #[error("操作已取消: {operation}")]
    Cancelled { operation: &'static str },

    #[error("会话错误: {operation}: {source}")]
    Session {
        operation: &'static str,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("{workflow} 事务已中止, 步骤 {step}: {source}")]
    TransactionAborted {
        workflow: Workflow,
        step: &'static str,
        #[source]
        source: Box<StoreError>,
    },

    #[error("基础设施错误: {0}")]
    Infra(#[from] InfraError),
}

/// 存储层 Result 类型别名
pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// 包装为工作流步骤失败
    pub fn aborted(workflow: Workflow, step: &'static str, source: StoreError) -> Self {
        Self::TransactionAborted {
            workflow,
            step,
            source: Box::new(source),
        }
    }

    /// 剥离工作流包装，返回最内层的原始错误
    pub fn root(&self) -> &StoreError {
        let mut current = self;
        while let Self::TransactionAborted { source, .. } = current {
            current = source;
        }
        current
    }

    /// 失败步骤名（仅工作流错误）
    pub fn failed_step(&self) -> Option<&'static str> {
        match self {
            Self::TransactionAborted { step, .. } => Some(step),
            _ => None,
        }
    }

    /// 是否属于“目标未命中或变更未生效”这一类
    pub fn is_count_mismatch(&self) -> bool {
        matches!(
            self.root(),
            Self::NotFound { .. } | Self::DeleteCountMismatch { .. } | Self::UpdateCountMismatch { .. }
        )
    }

    /// 是否值得整体重试（存储或会话层的瞬时失败）
    pub fn is_retryable(&self) -> bool {
        match self.root() {
            Self::Infra(e) => e.is_retryable(),
            root => matches!(
                root,
                Self::StoreReadFailed { .. }
                    | Self::StoreWriteFailed { .. }
                    | Self::Session { .. }
                    | Self::Cancelled { .. }
            ),
        }
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self.root() {
            Self::InvalidIdentifier { .. } => "INVALID_IDENTIFIER",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::DeleteCountMismatch { .. } => "DELETE_COUNT_MISMATCH",
            Self::UpdateCountMismatch { .. } => "UPDATE_COUNT_MISMATCH",
            Self::DecodeFailed { .. } => "DECODE_FAILED",
            Self::StoreReadFailed { .. } => "STORE_READ_FAILED",
            Self::StoreWriteFailed { .. } => "STORE_WRITE_FAILED",
            Self::IdentifierAssignmentFailed { .. } => "IDENTIFIER_ASSIGNMENT_FAILED",
            Self::AlreadyFinished { .. } => "ALREADY_FINISHED",
            Self::Cancelled { .. } => "CANCELLED",
            Self::Session { .. } => "SESSION_ERROR",
            Self::TransactionAborted { .. } => "TRANSACTION_ABORTED",
            Self::Infra(e) => e.code(),
        }
    }
}
