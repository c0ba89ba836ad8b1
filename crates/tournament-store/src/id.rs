//! 标识符编解码
//!
//! 外部以 24 位十六进制文本传递 ID，存储内部使用 `ObjectId`。
//! 解析在任何存储访问之前完成，格式错误的 ID 不会到达数据库。

use mongodb::bson::oid::ObjectId;

use crate::error::{Result, StoreError};

/// 解析 24 位十六进制文本
pub fn parse_id(text: &str) -> Result<ObjectId> {
    ObjectId::parse_str(text).map_err(|_| StoreError::InvalidIdentifier {
        value: text.to_string(),
    })
}

/// 格式化为 24 位小写十六进制文本
pub fn format_id(id: &ObjectId) -> String {
    id.to_hex()
}
