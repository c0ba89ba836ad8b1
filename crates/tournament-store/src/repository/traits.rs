//! 仓储 Trait 定义
//!
//! 上层服务只依赖 `TournamentRepository`，MongoDB 实现与内存实现可互换

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Account, Competition};

/// 锦标赛仓储接口
///
/// ID 以 24 位十六进制文本传入与返回。所有方法都可以通过丢弃 future 取消，
/// 未提交的事务随之中止。
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait TournamentRepository: Send + Sync {
    // 账户
    async fn create_account(&self, name: &str) -> Result<String>;
    async fn get_account(&self, id: &str) -> Result<Account>;
    async fn delete_account(&self, id: &str) -> Result<()>;
    async fn debit_account(&self, id: &str, amount: f64) -> Result<()>;
    async fn credit_account(&self, id: &str, amount: f64) -> Result<()>;

    // 比赛
    async fn create_competition(&self, name: &str, deposit: f64) -> Result<String>;
    async fn get_competition(&self, id: &str) -> Result<Competition>;
    async fn delete_competition(&self, id: &str) -> Result<()>;

    // 复合工作流
    async fn join_competition(&self, competition_id: &str, account_id: &str) -> Result<()>;
    async fn finish_competition(&self, competition_id: &str, winner_id: &str) -> Result<()>;

    /// 存储健康检查
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
