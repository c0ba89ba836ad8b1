//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use tournament_store::TournamentRepository;

/// Axum 应用共享状态
///
/// 只持有仓储接口，MongoDB 实现、内存实现与 mock 可互换
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn TournamentRepository>,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(repo: Arc<dyn TournamentRepository>) -> Self {
        Self { repo }
    }
}
