//! 比赛实体

use mongodb::bson::{Document, doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// 约定的结束状态，结算流程以此判断是否已支付奖金
pub const STATUS_FINISHED: &str = "finished";

/// 比赛
///
/// `users` 与 `winner` 只保存账户 ID 引用，账户详情需另行查询
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    /// 参赛押金，创建后不变
    pub deposit: f64,
    /// 自由文本状态，创建时为空
    #[serde(default)]
    pub status: String,
    /// 奖池，每次成功参赛累加一份押金
    #[serde(default)]
    pub prize: f64,
    /// 参赛者集合，无重复
    #[serde(default)]
    pub users: Vec<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<ObjectId>,
}

impl Competition {
    /// 新比赛的插入文档（ID 由存储生成）
    pub fn new_document(name: &str, deposit: f64) -> Document {
        doc! {
            "name": name,
            "deposit": deposit,
            "status": "",
            "prize": 0.0_f64,
            "users": [],
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == STATUS_FINISHED
    }

    pub fn has_member(&self, account_id: &ObjectId) -> bool {
        self.users.contains(account_id)
    }
}
