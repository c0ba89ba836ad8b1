//! 账户仓储
//!
//! 提供账户文档的增删查与余额增量调整，支持在事务会话中执行

use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::{ClientSession, Collection, Database};
use tracing::debug;

use super::document::{self, check_amount};
use crate::error::Result;
use crate::id::parse_id;
use crate::models::{ACCOUNTS_COLLECTION, Account};

const ENTITY: &str = "account";

/// 账户仓储
///
/// 所有变更都是单文档原子操作，余额调整使用 `$inc`，不做先读后写
#[derive(Clone)]
pub struct AccountRepository {
    collection: Collection<Document>,
}

impl AccountRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(ACCOUNTS_COLLECTION),
        }
    }

    // ==================== 查询操作 ====================

    /// 根据 ID 获取账户
    pub async fn get(&self, id: &str) -> Result<Account> {
        let id = parse_id(id)?;
        document::find(&self.collection, ENTITY, &id, None).await
    }

    // ==================== 写入操作 ====================

    /// 创建账户，初始余额为 0
    ///
    /// 返回存储生成的 ID
    pub async fn create(&self, name: &str) -> Result<ObjectId> {
        let id =
            document::insert(&self.collection, ENTITY, Account::new_document(name), None).await?;
        debug!(account_id = %id, name, "账户已创建");
        Ok(id)
    }

    /// 删除账户
    ///
    /// 删除数量不为 1（包括账户不存在）时返回 `DeleteCountMismatch`。
    /// 不会级联清理已参加的比赛。
    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = parse_id(id)?;
        document::delete(&self.collection, ENTITY, &id).await?;
        debug!(account_id = %id, "账户已删除");
        Ok(())
    }

    /// 调整余额
    ///
    /// `delta` 为负表示扣减；不检查下限，余额可以为负
    pub async fn adjust_balance(&self, id: &str, delta: f64) -> Result<()> {
        self.adjust_balance_with(None, id, delta).await
    }

    // ==================== 事务操作 ====================

    /// 在事务中调整余额
    pub async fn adjust_balance_in_tx(
        &self,
        session: &mut ClientSession,
        id: &str,
        delta: f64,
    ) -> Result<()> {
        self.adjust_balance_with(Some(session), id, delta).await
    }

    async fn adjust_balance_with(
        &self,
        session: Option<&mut ClientSession>,
        id: &str,
        delta: f64,
    ) -> Result<()> {
        let id = parse_id(id)?;
        let expect = check_amount("balance", delta)?;
        document::update(
            &self.collection,
            ENTITY,
            "balance",
            &id,
            doc! { "$inc": { "balance": delta } },
            expect,
            session,
        )
        .await?;
        debug!(account_id = %id, delta, "余额已调整");
        Ok(())
    }
}
