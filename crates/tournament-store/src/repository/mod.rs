//! 数据库仓储层
//!
//! 封装 MongoDB 文档操作，对外以 24 位十六进制文本传递 ID。
//!
//! ## 设计原则
//!
//! - 仓储只负责单文档持久化，跨文档的组合由事务编排负责
//! - 每个变更都校验命中数/修改数，未生效的变更一律视为错误
//! - 同一实现同时服务独立调用与事务会话（`_in_tx` 变体）
//! - 定义 trait 接口以支持 mock 测试

mod account_repo;
mod competition_repo;
pub(crate) mod document;
mod traits;

pub use account_repo::AccountRepository;
pub use competition_repo::CompetitionRepository;
pub use traits::*;
