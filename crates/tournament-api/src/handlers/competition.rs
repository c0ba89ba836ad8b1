//! 比赛 API 处理器
//!
//! 加入与结束比赛是事务工作流，失败时整体回滚，响应中的错误码来自失败步骤的原始错误

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;
use validator::Validate;

use crate::{
    dto::{
        ApiResponse, CompetitionDto, CreateCompetitionRequest, CreatedResponse,
        FinishCompetitionRequest, JoinCompetitionRequest,
    },
    error::Result,
    state::AppState,
};

/// 创建比赛
///
/// POST /api/competitions
pub async fn create_competition(
    State(state): State<AppState>,
    Json(req): Json<CreateCompetitionRequest>,
) -> Result<Json<ApiResponse<CreatedResponse>>> {
    req.validate()?;

    let id = state
        .repo
        .create_competition(&req.name, req.deposit)
        .await?;
    info!(competition_id = %id, name = %req.name, deposit = req.deposit, "Competition created");

    Ok(Json(ApiResponse::success(CreatedResponse { id })))
}

/// 获取比赛
///
/// GET /api/competitions/{id}
pub async fn get_competition(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CompetitionDto>>> {
    let competition = state.repo.get_competition(&id).await?;
    Ok(Json(ApiResponse::success(competition.into())))
}

/// 删除比赛
///
/// DELETE /api/competitions/{id}
pub async fn delete_competition(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    state.repo.delete_competition(&id).await?;
    info!(competition_id = %id, "Competition deleted");

    Ok(Json(ApiResponse::<()>::success_empty()))
}

/// 加入比赛
///
/// POST /api/competitions/{id}/join
pub async fn join_competition(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<JoinCompetitionRequest>,
) -> Result<Json<ApiResponse<()>>> {
    req.validate()?;

    state.repo.join_competition(&id, &req.account_id).await?;

    Ok(Json(ApiResponse::<()>::success_empty()))
}

/// 结束比赛并发放奖池
///
/// POST /api/competitions/{id}/finish
pub async fn finish_competition(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<FinishCompetitionRequest>,
) -> Result<Json<ApiResponse<()>>> {
    req.validate()?;

    state.repo.finish_competition(&id, &req.winner_id).await?;

    Ok(Json(ApiResponse::<()>::success_empty()))
}
