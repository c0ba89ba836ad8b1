//! 内存实现
//!
//! 与 MongoDB 实现保持相同的错误语义（包括命中数/修改数校验与工作流步骤名），
//! 用于上层服务的行为测试和本地开发。单把互斥锁覆盖全部状态，
//! 工作流在副本上逐步执行，全部成功后才写回，失败时状态不变。

use std::collections::HashMap;
use std::time::Instant;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use parking_lot::Mutex;

use crate::error::{Result, StoreError, Workflow};
use crate::id::{format_id, parse_id};
use crate::models::{Account, Competition, STATUS_FINISHED};
use crate::repository::TournamentRepository;
use crate::repository::document::{Expect, check_amount, check_update};
use crate::transaction::{at, observe};

#[derive(Default)]
struct MemoryState {
    accounts: HashMap<ObjectId, Account>,
    competitions: HashMap<ObjectId, Competition>,
}

/// 内存锦标赛存储
#[derive(Default)]
pub struct InMemoryTournamentStore {
    state: Mutex<MemoryState>,
}

impl InMemoryTournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前账户数量
    pub fn account_count(&self) -> usize {
        self.state.lock().accounts.len()
    }

    /// 当前比赛数量
    pub fn competition_count(&self) -> usize {
        self.state.lock().competitions.len()
    }
}

fn not_found(entity: &'static str, id: &ObjectId) -> StoreError {
    StoreError::NotFound {
        entity,
        id: format_id(id),
    }
}

/// 增量修改数值字段，对应 `$inc`
fn increment(
    value: &mut f64,
    entity: &'static str,
    field: &'static str,
    id: &ObjectId,
    delta: f64,
) -> Result<()> {
    let expect = check_amount(field, delta)?;
    let next = *value + delta;
    check_update(entity, field, id, 1, u64::from(next != *value), expect)?;
    *value = next;
    Ok(())
}

/// 覆盖字段，对应 `$set`；值未变化视为未修改
fn assign<T: PartialEq>(
    slot: &mut T,
    value: T,
    entity: &'static str,
    field: &'static str,
    id: &ObjectId,
) -> Result<()> {
    check_update(entity, field, id, 1, u64::from(*slot != value), Expect::Modified)?;
    *slot = value;
    Ok(())
}

fn join_staged(
    state: &mut MemoryState,
    competition_id: &ObjectId,
    account_id: ObjectId,
) -> Result<()> {
    let workflow = Workflow::Join;

    let mut competition = state
        .competitions
        .get(competition_id)
        .cloned()
        .ok_or_else(|| not_found("competition", competition_id))
        .map_err(at(workflow, "roster_update"))?;
    if competition.has_member(&account_id) {
        return Err(at(workflow, "roster_update")(StoreError::UpdateCountMismatch {
            entity: "competition",
            id: format_id(competition_id),
            field: "users",
            modified: 0,
        }));
    }
    competition.users.push(account_id);

    let deposit = competition.deposit;
    increment(
        &mut competition.prize,
        "competition",
        "prize",
        competition_id,
        deposit,
    )
    .map_err(at(workflow, "prize_update"))?;

    state.competitions.insert(*competition_id, competition);
    Ok(())
}

fn finish_staged(
    state: &mut MemoryState,
    competition_id: &ObjectId,
    winner_id: ObjectId,
) -> Result<()> {
    let workflow = Workflow::Finish;

    let mut competition = state
        .competitions
        .get(competition_id)
        .cloned()
        .ok_or_else(|| not_found("competition", competition_id))
        .map_err(at(workflow, "load_competition"))?;
    if competition.is_finished() {
        return Err(at(workflow, "status_guard")(StoreError::AlreadyFinished {
            id: format_id(competition_id),
        }));
    }

    assign(
        &mut competition.status,
        STATUS_FINISHED.to_string(),
        "competition",
        "status",
        competition_id,
    )
    .map_err(at(workflow, "status_update"))?;

    assign(
        &mut competition.winner,
        Some(winner_id),
        "competition",
        "winner",
        competition_id,
    )
    .map_err(at(workflow, "winner_update"))?;

    let prize = competition.prize;
    let mut winner = state
        .accounts
        .get(&winner_id)
        .cloned()
        .ok_or_else(|| not_found("account", &winner_id))
        .map_err(at(workflow, "winner_payout"))?;
    increment(&mut winner.balance, "account", "balance", &winner_id, prize)
        .map_err(at(workflow, "winner_payout"))?;

    state.competitions.insert(*competition_id, competition);
    state.accounts.insert(winner_id, winner);
    Ok(())
}

impl InMemoryTournamentStore {
    fn adjust_balance(&self, id: &str, delta: f64) -> Result<()> {
        let id = parse_id(id)?;
        let mut state = self.state.lock();
        let account = state
            .accounts
            .get_mut(&id)
            .ok_or_else(|| not_found("account", &id))?;
        increment(&mut account.balance, "account", "balance", &id, delta)
    }
}

#[async_trait]
impl TournamentRepository for InMemoryTournamentStore {
    async fn create_account(&self, name: &str) -> Result<String> {
        let id = ObjectId::new();
        self.state.lock().accounts.insert(
            id,
            Account {
                id,
                name: name.to_string(),
                balance: 0.0,
            },
        );
        Ok(format_id(&id))
    }

    async fn get_account(&self, id: &str) -> Result<Account> {
        let id = parse_id(id)?;
        self.state
            .lock()
            .accounts
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("account", &id))
    }

    async fn delete_account(&self, id: &str) -> Result<()> {
        let id = parse_id(id)?;
        match self.state.lock().accounts.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::DeleteCountMismatch {
                entity: "account",
                id: format_id(&id),
                deleted: 0,
            }),
        }
    }

    async fn debit_account(&self, id: &str, amount: f64) -> Result<()> {
        self.adjust_balance(id, -amount)
    }

    async fn credit_account(&self, id: &str, amount: f64) -> Result<()> {
        self.adjust_balance(id, amount)
    }

    async fn create_competition(&self, name: &str, deposit: f64) -> Result<String> {
        check_amount("deposit", deposit)?;
        let id = ObjectId::new();
        self.state.lock().competitions.insert(
            id,
            Competition {
                id,
                name: name.to_string(),
                deposit,
                status: String::new(),
                prize: 0.0,
                users: Vec::new(),
                winner: None,
            },
        );
        Ok(format_id(&id))
    }

    async fn get_competition(&self, id: &str) -> Result<Competition> {
        let id = parse_id(id)?;
        self.state
            .lock()
            .competitions
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("competition", &id))
    }

    async fn delete_competition(&self, id: &str) -> Result<()> {
        let id = parse_id(id)?;
        match self.state.lock().competitions.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::DeleteCountMismatch {
                entity: "competition",
                id: format_id(&id),
                deleted: 0,
            }),
        }
    }

    async fn join_competition(&self, competition_id: &str, account_id: &str) -> Result<()> {
        let started = Instant::now();
        let result = parse_id(competition_id).and_then(|competition_id| {
            let account_id = parse_id(account_id)?;
            join_staged(&mut self.state.lock(), &competition_id, account_id)
        });
        observe(Workflow::Join, &result, started);
        result
    }

    async fn finish_competition(&self, competition_id: &str, winner_id: &str) -> Result<()> {
        let started = Instant::now();
        let result = parse_id(competition_id).and_then(|competition_id| {
            let winner_id = parse_id(winner_id)?;
            finish_staged(&mut self.state.lock(), &competition_id, winner_id)
        });
        observe(Workflow::Finish, &result, started);
        result
    }
}
