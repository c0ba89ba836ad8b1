//! 健康检查

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::warn;

use crate::state::AppState;

/// 就绪检查：存储不可用时返回 503
///
/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.repo.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "checks": { "store": "ok" } })),
        ),
        Err(e) => {
            warn!(error = %e, "存储健康检查失败");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "checks": { "store": "fail" } })),
            )
        }
    }
}
