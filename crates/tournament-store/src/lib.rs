//! 锦标赛存储层
//!
//! 提供账户与比赛的持久化，以及两个多文档原子工作流：
//!
//! - **加入比赛**：账户加入参赛名单，押金累加到奖池
//! - **结束比赛**：标记结束、记录获胜者、奖池发放到获胜者余额
//!
//! ## 模块结构
//!
//! - `id`: 24 位十六进制 ID 编解码
//! - `models`: 账户与比赛文档
//! - `repository`: 单文档仓储与 `TournamentRepository` 接口
//! - `transaction`: 事务作用域与工作流编排
//! - `mongo`: MongoDB 实现（需要副本集以支持事务）
//! - `memory`: 内存实现，错误语义与 MongoDB 实现一致

pub mod error;
pub mod id;
pub mod memory;
pub mod models;
pub mod mongo;
pub mod repository;
pub mod transaction;

pub use error::{Result, StoreError, Workflow};
pub use id::{format_id, parse_id};
pub use memory::InMemoryTournamentStore;
pub use models::{Account, Competition};
pub use mongo::MongoTournamentStore;
#[cfg(any(test, feature = "mock"))]
pub use repository::MockTournamentRepository;
pub use repository::{AccountRepository, CompetitionRepository, TournamentRepository};
pub use transaction::{TransactionOrchestrator, TransactionScope};
