//! 事务编排
//!
//! 把多个单文档变更组合为原子工作流（加入比赛、结束比赛）。
//! 工作流是线性的：任一步失败立即中止事务，不做重试，由调用方决定是否整体重试。

use std::time::Instant;

use mongodb::{Client, ClientSession};
use tournament_shared::observability::metrics::record_workflow;
use tracing::{info, instrument, warn};

use crate::error::{Result, StoreError, Workflow};
use crate::id::parse_id;
use crate::models::STATUS_FINISHED;
use crate::repository::{AccountRepository, CompetitionRepository};

/// 生成步骤失败的包装函数，配合 `map_err` 使用
pub(crate) fn at(workflow: Workflow, step: &'static str) -> impl FnOnce(StoreError) -> StoreError {
    move |source| StoreError::aborted(workflow, step, source)
}

/// 事务作用域
///
/// 持有已开启事务的会话。`commit` 消费作用域；失败路径显式中止，
/// 即使作用域被直接丢弃，服务端也会在会话结束时中止未提交的事务。
pub struct TransactionScope {
    session: ClientSession,
    workflow: Workflow,
}

impl TransactionScope {
    /// 开启会话与事务
    pub async fn begin(client: &Client, workflow: Workflow) -> Result<Self> {
        let mut session = client.start_session().await.map_err(|source| {
            StoreError::aborted(
                workflow,
                "begin",
                StoreError::Session {
                    operation: "start_session",
                    source,
                },
            )
        })?;

        session.start_transaction().await.map_err(|source| {
            StoreError::aborted(
                workflow,
                "begin",
                StoreError::Session {
                    operation: "start_transaction",
                    source,
                },
            )
        })?;

        Ok(Self { session, workflow })
    }

    /// 事务内的会话，所有步骤都必须经由它执行
    pub fn session(&mut self) -> &mut ClientSession {
        &mut self.session
    }

    /// 提交事务
    pub async fn commit(mut self) -> Result<()> {
        let workflow = self.workflow;
        self.session.commit_transaction().await.map_err(|source| {
            StoreError::aborted(
                workflow,
                "commit",
                StoreError::Session {
                    operation: "commit_transaction",
                    source,
                },
            )
        })
    }

    /// 中止事务
    ///
    /// 中止失败只记录日志，原始错误更有价值
    pub async fn abort(mut self) {
        if let Err(e) = self.session.abort_transaction().await {
            warn!(workflow = %self.workflow, error = %e, "事务中止失败");
        }
    }

    /// 根据步骤结果提交或中止
    pub async fn finish(self, outcome: Result<()>) -> Result<()> {
        match outcome {
            Ok(()) => self.commit().await,
            Err(e) => {
                self.abort().await;
                Err(e)
            }
        }
    }
}

/// 事务编排器
///
/// 持有客户端与两个仓储，每次工作流开启独立会话
#[derive(Clone)]
pub struct TransactionOrchestrator {
    client: Client,
    accounts: AccountRepository,
    competitions: CompetitionRepository,
}

impl TransactionOrchestrator {
    pub fn new(
        client: Client,
        accounts: AccountRepository,
        competitions: CompetitionRepository,
    ) -> Self {
        Self {
            client,
            accounts,
            competitions,
        }
    }

    /// 账户加入比赛
    ///
    /// 把账户加入名单，并把比赛的入场费累加到奖池。重复加入在名单步骤失败，
    /// 奖池保持不变。
    #[instrument(skip(self))]
    pub async fn join(&self, competition_id: &str, account_id: &str) -> Result<()> {
        let started = Instant::now();
        let result = self.run_join(competition_id, account_id).await;
        observe(Workflow::Join, &result, started);
        result
    }

    /// 结束比赛
    ///
    /// 标记结束、记录获胜者，并把奖池全额发放到获胜者余额。
    /// 已结束的比赛在事务内被拒绝，奖金不会重复发放。
    #[instrument(skip(self))]
    pub async fn finish(&self, competition_id: &str, winner_id: &str) -> Result<()> {
        let started = Instant::now();
        let result = self.run_finish(competition_id, winner_id).await;
        observe(Workflow::Finish, &result, started);
        result
    }

    async fn run_join(&self, competition_id: &str, account_id: &str) -> Result<()> {
        parse_id(competition_id)?;
        parse_id(account_id)?;

        let mut scope = TransactionScope::begin(&self.client, Workflow::Join).await?;
        let outcome = self
            .join_steps(scope.session(), competition_id, account_id)
            .await;
        scope.finish(outcome).await
    }

    async fn join_steps(
        &self,
        session: &mut ClientSession,
        competition_id: &str,
        account_id: &str,
    ) -> Result<()> {
        let workflow = Workflow::Join;

        self.competitions
            .add_to_roster_in_tx(session, competition_id, account_id)
            .await
            .map_err(at(workflow, "roster_update"))?;

        let competition = self
            .competitions
            .get_in_tx(session, competition_id)
            .await
            .map_err(at(workflow, "load_competition"))?;

        self.competitions
            .adjust_prize_in_tx(session, competition_id, competition.deposit)
            .await
            .map_err(at(workflow, "prize_update"))
    }

    async fn run_finish(&self, competition_id: &str, winner_id: &str) -> Result<()> {
        parse_id(competition_id)?;
        parse_id(winner_id)?;

        let mut scope = TransactionScope::begin(&self.client, Workflow::Finish).await?;
        let outcome = self
            .finish_steps(scope.session(), competition_id, winner_id)
            .await;
        scope.finish(outcome).await
    }

    async fn finish_steps(
        &self,
        session: &mut ClientSession,
        competition_id: &str,
        winner_id: &str,
    ) -> Result<()> {
        let workflow = Workflow::Finish;

        let competition = self
            .competitions
            .get_in_tx(session, competition_id)
            .await
            .map_err(at(workflow, "load_competition"))?;
        if competition.is_finished() {
            return Err(StoreError::aborted(
                workflow,
                "status_guard",
                StoreError::AlreadyFinished {
                    id: competition_id.to_string(),
                },
            ));
        }

        self.competitions
            .set_status_in_tx(session, competition_id, STATUS_FINISHED)
            .await
            .map_err(at(workflow, "status_update"))?;

        self.competitions
            .set_winner_in_tx(session, competition_id, winner_id)
            .await
            .map_err(at(workflow, "winner_update"))?;

        let competition = self
            .competitions
            .get_in_tx(session, competition_id)
            .await
            .map_err(at(workflow, "load_prize"))?;

        self.accounts
            .adjust_balance_in_tx(session, winner_id, competition.prize)
            .await
            .map_err(at(workflow, "winner_payout"))
    }
}

/// 记录工作流结果的日志与指标
pub(crate) fn observe(workflow: Workflow, result: &Result<()>, started: Instant) {
    let elapsed = started.elapsed().as_secs_f64();
    match result {
        Ok(()) => {
            info!(workflow = %workflow, elapsed_secs = elapsed, "工作流已提交");
            record_workflow(workflow.as_str(), "committed", elapsed);
        }
        Err(e) => {
            warn!(
                workflow = %workflow,
                step = e.failed_step().unwrap_or("none"),
                error_code = e.error_code(),
                error = %e,
                "工作流已中止"
            );
            record_workflow(workflow.as_str(), "aborted", elapsed);
        }
    }
}
