//! 锦标赛 HTTP 服务
//!
//! 以 REST API 暴露账户与比赛操作，底层通过 `TournamentRepository` 访问存储。
//!
//! ## 模块结构
//!
//! - `dto`: 请求和响应的数据传输对象
//! - `error`: 错误类型与状态码映射
//! - `handlers`: HTTP 请求处理器
//! - `routes`: 路由配置
//! - `state`: 应用状态
//!
//! ## 技术栈
//!
//! - Web 框架：Axum
//! - 数据验证：validator
//! - 序列化：serde (camelCase)

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use dto::{AccountDto, ApiResponse, CompetitionDto, CreatedResponse};
pub use error::{ApiError, Result};
pub use state::AppState;
