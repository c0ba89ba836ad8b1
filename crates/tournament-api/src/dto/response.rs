//! 响应 DTO 定义
//!
//! ID 一律以 24 位十六进制文本输出

use serde::{Deserialize, Serialize};
use tournament_store::{Account, Competition, format_id};

/// API 统一响应
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: Some(data),
        }
    }

    /// 创建成功响应（无数据）
    pub fn success_empty() -> ApiResponse<()> {
        ApiResponse {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: None,
        }
    }
}

/// 创建成功后返回的 ID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// 账户响应 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub id: String,
    pub name: String,
    pub balance: f64,
}

impl From<Account> for AccountDto {
    fn from(account: Account) -> Self {
        Self {
            id: format_id(&account.id),
            name: account.name,
            balance: account.balance,
        }
    }
}

/// 比赛响应 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionDto {
    pub id: String,
    pub name: String,
    pub deposit: f64,
    pub status: String,
    pub prize: f64,
    pub users: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

impl From<Competition> for CompetitionDto {
    fn from(competition: Competition) -> Self {
        Self {
            id: format_id(&competition.id),
            name: competition.name,
            deposit: competition.deposit,
            status: competition.status,
            prize: competition.prize,
            users: competition.users.iter().map(format_id).collect(),
            winner: competition.winner.as_ref().map(format_id),
        }
    }
}
