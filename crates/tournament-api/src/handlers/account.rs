//! 账户 API 处理器

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;
use validator::Validate;

use crate::{
    dto::{AccountDto, ApiResponse, CreateAccountRequest, CreatedResponse, PointsRequest},
    error::Result,
    state::AppState,
};

/// 创建账户
///
/// POST /api/accounts
pub async fn create_account(
    State(state): State<AppState>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<Json<ApiResponse<CreatedResponse>>> {
    req.validate()?;

    let id = state.repo.create_account(&req.name).await?;
    info!(account_id = %id, name = %req.name, "Account created");

    Ok(Json(ApiResponse::success(CreatedResponse { id })))
}

/// 获取账户
///
/// GET /api/accounts/{id}
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AccountDto>>> {
    let account = state.repo.get_account(&id).await?;
    Ok(Json(ApiResponse::success(account.into())))
}

/// 删除账户
///
/// DELETE /api/accounts/{id}
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    state.repo.delete_account(&id).await?;
    info!(account_id = %id, "Account deleted");

    Ok(Json(ApiResponse::<()>::success_empty()))
}

/// 扣减积分
///
/// POST /api/accounts/{id}/take
pub async fn take_points(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PointsRequest>,
) -> Result<Json<ApiResponse<()>>> {
    req.validate()?;

    state.repo.debit_account(&id, req.points).await?;
    info!(account_id = %id, points = req.points, "Points taken");

    Ok(Json(ApiResponse::<()>::success_empty()))
}

/// 充值积分
///
/// POST /api/accounts/{id}/fund
pub async fn fund_points(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PointsRequest>,
) -> Result<Json<ApiResponse<()>>> {
    req.validate()?;

    state.repo.credit_account(&id, req.points).await?;
    info!(account_id = %id, points = req.points, "Points funded");

    Ok(Json(ApiResponse::<()>::success_empty()))
}
