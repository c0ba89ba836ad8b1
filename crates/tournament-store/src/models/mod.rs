//! 领域模型
//!
//! 账户与比赛两类文档的持久化形态

pub mod account;
pub mod competition;

pub use account::Account;
pub use competition::{Competition, STATUS_FINISHED};

/// 账户集合名
pub const ACCOUNTS_COLLECTION: &str = "accounts";
/// 比赛集合名
pub const COMPETITIONS_COLLECTION: &str = "competitions";
