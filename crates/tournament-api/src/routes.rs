//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tournament_shared::observability::middleware as obs_middleware;

use crate::{handlers, state::AppState};

/// 账户路由
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(handlers::account::create_account))
        .route(
            "/accounts/{id}",
            get(handlers::account::get_account).delete(handlers::account::delete_account),
        )
        .route("/accounts/{id}/take", post(handlers::account::take_points))
        .route("/accounts/{id}/fund", post(handlers::account::fund_points))
}

/// 比赛路由
fn competition_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/competitions",
            post(handlers::competition::create_competition),
        )
        .route(
            "/competitions/{id}",
            get(handlers::competition::get_competition)
                .delete(handlers::competition::delete_competition),
        )
        .route(
            "/competitions/{id}/join",
            post(handlers::competition::join_competition),
        )
        .route(
            "/competitions/{id}/finish",
            post(handlers::competition::finish_competition),
        )
}

/// 构建 `/api` 下的全部路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(account_routes())
        .merge(competition_routes())
        .route("/health", get(handlers::health::health_check))
}

/// 构建完整应用（含可观测性中间件）
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}
