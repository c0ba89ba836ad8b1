//! 测试工具模块
//!
//! 提供集成测试所需的辅助函数。需要真实 MongoDB 的测试通过
//! `TEST_MONGODB_URL` 指定副本集地址，每次调用都会得到独立的数据库名，
//! 并行测试之间互不干扰。

use uuid::Uuid;

use crate::config::DatabaseConfig;

/// 创建测试用数据库配置
///
/// 优先使用环境变量，否则使用本地单节点副本集
pub fn test_database_config() -> DatabaseConfig {
    DatabaseConfig {
        url: std::env::var("TEST_MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/?replicaSet=rs0".to_string()),
        database: test_database_name(),
        app_name: Some("tournament-tests".to_string()),
        max_pool_size: 5,
        connect_timeout_seconds: 10,
        operation_timeout_seconds: 10,
    }
}

/// 生成唯一的测试数据库名
pub fn test_database_name() -> String {
    format!("tournament_test_{}", Uuid::new_v4().simple())
}
