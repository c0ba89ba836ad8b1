//! HTTP 请求处理器

pub mod account;
pub mod competition;
pub mod health;
