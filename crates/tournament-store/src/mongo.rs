//! MongoDB 实现
//!
//! 组合两个仓储与事务编排器，实现 `TournamentRepository`。
//! 每个操作都受统一的超时约束，超时后 future 被丢弃，未提交的事务随之中止。

use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tournament_shared::database::Database;
use tracing::warn;

use crate::error::{Result, StoreError, Workflow};
use crate::id::format_id;
use crate::models::{Account, Competition};
use crate::repository::{AccountRepository, CompetitionRepository, TournamentRepository};
use crate::transaction::{TransactionOrchestrator, observe};

/// 基于 MongoDB 的锦标赛存储
#[derive(Clone)]
pub struct MongoTournamentStore {
    database: Database,
    accounts: AccountRepository,
    competitions: CompetitionRepository,
    orchestrator: TransactionOrchestrator,
    operation_timeout: Duration,
}

impl MongoTournamentStore {
    /// 从已连接的数据库句柄构建
    pub fn new(database: &Database, operation_timeout: Duration) -> Self {
        let accounts = AccountRepository::new(database.database());
        let competitions = CompetitionRepository::new(database.database());
        let orchestrator = TransactionOrchestrator::new(
            database.client().clone(),
            accounts.clone(),
            competitions.clone(),
        );

        Self {
            database: database.clone(),
            accounts,
            competitions,
            orchestrator,
            operation_timeout,
        }
    }
}

/// 在超时约束下执行操作，超时为 0 时不限制
pub(crate) async fn with_deadline<T, F>(
    timeout: Duration,
    operation: &'static str,
    fut: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if timeout.is_zero() {
        return fut.await;
    }
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                operation,
                timeout_ms = timeout.as_millis() as u64,
                "存储操作超时"
            );
            Err(StoreError::Cancelled { operation })
        }
    }
}

/// 带超时的工作流
///
/// 编排器只在 future 跑完时记录结果；超时丢弃 future 时由这里补记一次中止
pub(crate) async fn workflow_with_deadline<F>(
    timeout: Duration,
    workflow: Workflow,
    operation: &'static str,
    fut: F,
) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    let started = Instant::now();
    let result = with_deadline(timeout, operation, fut).await;
    if matches!(result, Err(StoreError::Cancelled { .. })) {
        observe(workflow, &result, started);
    }
    result
}

#[async_trait]
impl TournamentRepository for MongoTournamentStore {
    async fn create_account(&self, name: &str) -> Result<String> {
        with_deadline(self.operation_timeout, "create_account", async {
            self.accounts.create(name).await.map(|id| format_id(&id))
        })
        .await
    }

    async fn get_account(&self, id: &str) -> Result<Account> {
        with_deadline(self.operation_timeout, "get_account", self.accounts.get(id)).await
    }

    async fn delete_account(&self, id: &str) -> Result<()> {
        with_deadline(self.operation_timeout, "delete_account", self.accounts.delete(id)).await
    }

    async fn debit_account(&self, id: &str, amount: f64) -> Result<()> {
        with_deadline(
            self.operation_timeout,
            "debit_account",
            self.accounts.adjust_balance(id, -amount),
        )
        .await
    }

    async fn credit_account(&self, id: &str, amount: f64) -> Result<()> {
        with_deadline(
            self.operation_timeout,
            "credit_account",
            self.accounts.adjust_balance(id, amount),
        )
        .await
    }

    async fn create_competition(&self, name: &str, deposit: f64) -> Result<String> {
        with_deadline(self.operation_timeout, "create_competition", async {
            self.competitions
                .create(name, deposit)
                .await
                .map(|id| format_id(&id))
        })
        .await
    }

    async fn get_competition(&self, id: &str) -> Result<Competition> {
        with_deadline(self.operation_timeout, "get_competition", self.competitions.get(id)).await
    }

    async fn delete_competition(&self, id: &str) -> Result<()> {
        with_deadline(
            self.operation_timeout,
            "delete_competition",
            self.competitions.delete(id),
        )
        .await
    }

    async fn join_competition(&self, competition_id: &str, account_id: &str) -> Result<()> {
        workflow_with_deadline(
            self.operation_timeout,
            Workflow::Join,
            "join_competition",
            self.orchestrator.join(competition_id, account_id),
        )
        .await
    }

    async fn finish_competition(&self, competition_id: &str, winner_id: &str) -> Result<()> {
        workflow_with_deadline(
            self.operation_timeout,
            Workflow::Finish,
            "finish_competition",
            self.orchestrator.finish(competition_id, winner_id),
        )
        .await
    }

    async fn health_check(&self) -> Result<()> {
        with_deadline(self.operation_timeout, "health_check", async {
            self.database.health_check().await.map_err(StoreError::from)
        })
        .await
    }
}
