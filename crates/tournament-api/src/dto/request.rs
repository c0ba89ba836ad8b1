//! 请求 DTO 定义

use serde::Deserialize;
use validator::Validate;

/// 创建账户请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, max = 100, message = "名称长度必须在1-100个字符之间"))]
    pub name: String,
}

/// 扣减或充值积分请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PointsRequest {
    #[validate(range(min = 0.0, message = "积分不能为负数"))]
    pub points: f64,
}

/// 创建比赛请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompetitionRequest {
    #[validate(length(min = 1, max = 100, message = "名称长度必须在1-100个字符之间"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "押金不能为负数"))]
    pub deposit: f64,
}

/// 加入比赛请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JoinCompetitionRequest {
    #[validate(length(min = 1, message = "账户 ID 不能为空"))]
    pub account_id: String,
}

/// 结束比赛请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FinishCompetitionRequest {
    #[validate(length(min = 1, message = "获胜者 ID 不能为空"))]
    pub winner_id: String,
}
