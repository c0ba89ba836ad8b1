//! 比赛仓储
//!
//! 提供比赛文档的增删查，以及参赛名单、奖池、状态、获胜者的单字段变更。
//! 变更方法都有对应的 `_in_tx` 版本，供事务编排在同一会话内组合调用。

use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::{ClientSession, Collection, Database};
use tracing::debug;

use super::document::{self, Expect, check_amount};
use crate::error::Result;
use crate::id::parse_id;
use crate::models::{COMPETITIONS_COLLECTION, Competition};

const ENTITY: &str = "competition";

/// 比赛仓储
#[derive(Clone)]
pub struct CompetitionRepository {
    collection: Collection<Document>,
}

impl CompetitionRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COMPETITIONS_COLLECTION),
        }
    }

    // ==================== 查询操作 ====================

    /// 根据 ID 获取比赛
    pub async fn get(&self, id: &str) -> Result<Competition> {
        let id = parse_id(id)?;
        document::find(&self.collection, ENTITY, &id, None).await
    }

    // ==================== 写入操作 ====================

    /// 创建比赛
    ///
    /// 奖池为 0，名单为空，状态为空串，不设置获胜者
    pub async fn create(&self, name: &str, deposit: f64) -> Result<ObjectId> {
        check_amount("deposit", deposit)?;
        let id = document::insert(
            &self.collection,
            ENTITY,
            Competition::new_document(name, deposit),
            None,
        )
        .await?;
        debug!(competition_id = %id, name, deposit, "比赛已创建");
        Ok(id)
    }

    /// 删除比赛
    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = parse_id(id)?;
        document::delete(&self.collection, ENTITY, &id).await?;
        debug!(competition_id = %id, "比赛已删除");
        Ok(())
    }

    /// 把账户加入参赛名单
    ///
    /// 使用 `$addToSet`，重复加入不会产生重复项，但会因修改数为 0
    /// 返回 `UpdateCountMismatch`；比赛不存在返回 `NotFound`
    pub async fn add_to_roster(&self, competition_id: &str, account_id: &str) -> Result<()> {
        self.add_to_roster_with(None, competition_id, account_id)
            .await
    }

    /// 调整奖池
    pub async fn adjust_prize(&self, id: &str, delta: f64) -> Result<()> {
        self.adjust_prize_with(None, id, delta).await
    }

    /// 设置获胜者（只保存账户 ID）
    pub async fn set_winner(&self, id: &str, account_id: &str) -> Result<()> {
        self.set_winner_with(None, id, account_id).await
    }

    /// 设置状态
    pub async fn set_status(&self, id: &str, status: &str) -> Result<()> {
        self.set_status_with(None, id, status).await
    }

    // ==================== 事务操作 ====================

    /// 在事务中获取比赛，读到的是本事务快照（包含本事务已做的修改）
    pub async fn get_in_tx(&self, session: &mut ClientSession, id: &str) -> Result<Competition> {
        let id = parse_id(id)?;
        document::find(&self.collection, ENTITY, &id, Some(session)).await
    }

    pub async fn add_to_roster_in_tx(
        &self,
        session: &mut ClientSession,
        competition_id: &str,
        account_id: &str,
    ) -> Result<()> {
        self.add_to_roster_with(Some(session), competition_id, account_id)
            .await
    }

    pub async fn adjust_prize_in_tx(
        &self,
        session: &mut ClientSession,
        id: &str,
        delta: f64,
    ) -> Result<()> {
        self.adjust_prize_with(Some(session), id, delta).await
    }

    pub async fn set_winner_in_tx(
        &self,
        session: &mut ClientSession,
        id: &str,
        account_id: &str,
    ) -> Result<()> {
        self.set_winner_with(Some(session), id, account_id).await
    }

    pub async fn set_status_in_tx(
        &self,
        session: &mut ClientSession,
        id: &str,
        status: &str,
    ) -> Result<()> {
        self.set_status_with(Some(session), id, status).await
    }

    async fn add_to_roster_with(
        &self,
        session: Option<&mut ClientSession>,
        competition_id: &str,
        account_id: &str,
    ) -> Result<()> {
        let competition_id = parse_id(competition_id)?;
        let account_id = parse_id(account_id)?;
        document::update(
            &self.collection,
            ENTITY,
            "users",
            &competition_id,
            doc! { "$addToSet": { "users": account_id } },
            Expect::Modified,
            session,
        )
        .await?;
        debug!(
            competition_id = %competition_id,
            account_id = %account_id,
            "已加入参赛名单"
        );
        Ok(())
    }

    async fn adjust_prize_with(
        &self,
        session: Option<&mut ClientSession>,
        id: &str,
        delta: f64,
    ) -> Result<()> {
        let id = parse_id(id)?;
        let expect = check_amount("prize", delta)?;
        document::update(
            &self.collection,
            ENTITY,
            "prize",
            &id,
            doc! { "$inc": { "prize": delta } },
            expect,
            session,
        )
        .await?;
        debug!(competition_id = %id, delta, "奖池已调整");
        Ok(())
    }

    async fn set_winner_with(
        &self,
        session: Option<&mut ClientSession>,
        id: &str,
        account_id: &str,
    ) -> Result<()> {
        let id = parse_id(id)?;
        let account_id = parse_id(account_id)?;
        document::update(
            &self.collection,
            ENTITY,
            "winner",
            &id,
            doc! { "$set": { "winner": account_id } },
            Expect::Modified,
            session,
        )
        .await
    }

    async fn set_status_with(
        &self,
        session: Option<&mut ClientSession>,
        id: &str,
        status: &str,
    ) -> Result<()> {
        let id = parse_id(id)?;
        document::update(
            &self.collection,
            ENTITY,
            "status",
            &id,
            doc! { "$set": { "status": status } },
            Expect::Modified,
            session,
        )
        .await
    }
}
