//! 账户实体

use mongodb::bson::{Document, doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// 账户
///
/// 名称创建后不可修改，余额只通过增量调整变化，允许为负
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub balance: f64,
}

impl Account {
    /// 新账户的插入文档（ID 由存储生成）
    pub fn new_document(name: &str) -> Document {
        doc! {
            "name": name,
            "balance": 0.0_f64,
        }
    }
}
