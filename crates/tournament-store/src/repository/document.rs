//! 单文档操作
//!
//! 两个仓储共用的 find/insert/update/delete 实现。每个函数都接受可选会话：
//! 传入时操作加入该会话的事务，不传时作为独立的单文档原子操作执行。
//! 变更类操作在这里统一做数量校验。

use mongodb::bson::{self, Bson, Document, doc, oid::ObjectId};
use mongodb::{ClientSession, Collection};
use serde::de::DeserializeOwned;

use crate::error::{Result, StoreError};
use crate::id::format_id;

/// 数量校验方式
#[derive(Debug, Clone, Copy)]
pub(crate) enum Expect {
    /// 必须恰好修改一个文档
    Modified,
    /// 只要求命中一个文档（增量为 0 时存储不会报告修改）
    Matched,
}

pub(crate) async fn insert(
    collection: &Collection<Document>,
    entity: &'static str,
    document: Document,
    session: Option<&mut ClientSession>,
) -> Result<ObjectId> {
    let action = collection.insert_one(document);
    let inserted = match session {
        Some(session) => action.session(session).await,
        None => action.await,
    }
    .map_err(|source| StoreError::StoreWriteFailed {
        entity,
        operation: "insert",
        source,
    })?;

    match inserted.inserted_id {
        Bson::ObjectId(id) => Ok(id),
        _ => Err(StoreError::IdentifierAssignmentFailed { entity }),
    }
}

pub(crate) async fn find<T: DeserializeOwned>(
    collection: &Collection<Document>,
    entity: &'static str,
    id: &ObjectId,
    session: Option<&mut ClientSession>,
) -> Result<T> {
    let action = collection.find_one(doc! { "_id": *id });
    let found = match session {
        Some(session) => action.session(session).await,
        None => action.await,
    }
    .map_err(|source| StoreError::StoreReadFailed {
        entity,
        operation: "find",
        source,
    })?;

    let document = found.ok_or_else(|| StoreError::NotFound {
        entity,
        id: format_id(id),
    })?;

    decode(entity, id, document)
}

/// 把查询到的文档解析为实体，字段缺失或类型不符时返回 `DecodeFailed`
pub(crate) fn decode<T: DeserializeOwned>(
    entity: &'static str,
    id: &ObjectId,
    document: Document,
) -> Result<T> {
    bson::from_document(document).map_err(|source| StoreError::DecodeFailed {
        entity,
        id: format_id(id),
        source,
    })
}

pub(crate) async fn update(
    collection: &Collection<Document>,
    entity: &'static str,
    field: &'static str,
    id: &ObjectId,
    change: Document,
    expect: Expect,
    session: Option<&mut ClientSession>,
) -> Result<()> {
    let action = collection.update_one(doc! { "_id": *id }, change);
    let updated = match session {
        Some(session) => action.session(session).await,
        None => action.await,
    }
    .map_err(|source| StoreError::StoreWriteFailed {
        entity,
        operation: "update",
        source,
    })?;

    check_update(entity, field, id, updated.matched_count, updated.modified_count, expect)
}

pub(crate) async fn delete(
    collection: &Collection<Document>,
    entity: &'static str,
    id: &ObjectId,
) -> Result<()> {
    let deleted = collection
        .delete_one(doc! { "_id": *id })
        .await
        .map_err(|source| StoreError::StoreWriteFailed {
            entity,
            operation: "delete",
            source,
        })?;

    if deleted.deleted_count != 1 {
        return Err(StoreError::DeleteCountMismatch {
            entity,
            id: format_id(id),
            deleted: deleted.deleted_count,
        });
    }
    Ok(())
}

/// 把存储返回的命中数/修改数转换为错误
pub(crate) fn check_update(
    entity: &'static str,
    field: &'static str,
    id: &ObjectId,
    matched: u64,
    modified: u64,
    expect: Expect,
) -> Result<()> {
    if matched == 0 {
        return Err(StoreError::NotFound {
            entity,
            id: format_id(id),
        });
    }
    if matches!(expect, Expect::Modified) && modified != 1 {
        return Err(StoreError::UpdateCountMismatch {
            entity,
            id: format_id(id),
            field,
            modified,
        });
    }
    Ok(())
}

/// 增量必须是有限数，NaN 写入后会污染整个余额/奖池
pub(crate) fn check_amount(field: &'static str, value: f64) -> Result<Expect> {
    if !value.is_finite() {
        return Err(StoreError::InvalidAmount { field, value });
    }
    Ok(if value == 0.0 {
        Expect::Matched
    } else {
        Expect::Modified
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Account;

    #[test]
    fn test_decode_account() {
        let id = ObjectId::new();
        let account: Account =
            decode("account", &id, doc! { "_id": id, "name": "alice", "balance": 12.5 }).unwrap();
        assert_eq!(account.id, id);
        assert_eq!(account.balance, 12.5);
    }

    #[test]
    fn test_decode_malformed_document() {
        let id = ObjectId::new();
        let err = decode::<Account>("account", &id, doc! { "_id": id, "name": 1 }).unwrap_err();
        match err {
            StoreError::DecodeFailed { entity, id: failed_id, .. } => {
                assert_eq!(entity, "account");
                assert_eq!(failed_id, format_id(&id));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            decode::<Account>("account", &id, doc! { "_id": id }).unwrap_err().error_code(),
            "DECODE_FAILED"
        );
    }

    #[test]
    fn test_check_update_not_found() {
        let id = ObjectId::new();
        let err = check_update("competition", "users", &id, 0, 0, Expect::Modified).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "competition", .. }));
    }

    #[test]
    fn test_check_update_unmodified() {
        let id = ObjectId::new();
        let err = check_update("competition", "users", &id, 1, 0, Expect::Modified).unwrap_err();
        assert!(matches!(
            err,
            StoreError::UpdateCountMismatch {
                field: "users",
                modified: 0,
                ..
            }
        ));
        assert!(check_update("account", "balance", &id, 1, 0, Expect::Matched).is_ok());
        assert!(check_update("account", "balance", &id, 1, 1, Expect::Modified).is_ok());
    }

    #[test]
    fn test_check_amount() {
        assert!(matches!(check_amount("balance", 0.0), Ok(Expect::Matched)));
        assert!(matches!(check_amount("balance", -5.0), Ok(Expect::Modified)));
        assert!(matches!(
            check_amount("prize", f64::NAN),
            Err(StoreError::InvalidAmount { field: "prize", .. })
        ));
        assert!(check_amount("prize", f64::INFINITY).is_err());
    }
}
