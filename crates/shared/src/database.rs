//! 数据库连接管理模块
//!
//! 提供 MongoDB 客户端管理，支持健康检查和连接配置。
//! 客户端内部维护连接池，`Database` 克隆开销很小，可以在各仓储间共享。

use crate::config::DatabaseConfig;
use crate::error::{InfraError, Result};
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database as MongoDatabase};
use std::time::Duration;
use tracing::{info, instrument};

/// MongoDB 客户端包装
#[derive(Clone, Debug)]
pub struct Database {
    client: Client,
    database: MongoDatabase,
}

impl Database {
    /// 建立连接并执行一次 ping
    #[instrument(skip(config), fields(database = %config.database))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to database...");

        let mut options = ClientOptions::parse(&config.url).await?;
        options.app_name = config.app_name.clone();
        options.max_pool_size = Some(config.max_pool_size);
        options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_seconds));
        options.server_selection_timeout =
            Some(Duration::from_secs(config.connect_timeout_seconds));

        let client = Client::with_options(options)?;
        let database = client.database(&config.database);
        let db = Self { client, database };

        // 驱动是惰性连接的，ping 失败说明地址或副本集配置有误
        let timeout = Duration::from_secs(config.connect_timeout_seconds.max(1));
        tokio::time::timeout(timeout, db.health_check())
            .await
            .map_err(|_| InfraError::ConnectTimeout {
                seconds: config.connect_timeout_seconds,
            })??;

        info!("Database connection established");

        Ok(db)
    }

    /// 获取客户端（用于开启会话）
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// 获取业务数据库句柄
    pub fn database(&self) -> &MongoDatabase {
        &self.database
    }

    /// 健康检查
    pub async fn health_check(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(InfraError::from)
    }

    /// 关闭客户端，等待进行中的操作结束
    pub async fn close(self) {
        self.client.shutdown().await;
        info!("Database client closed");
    }
}

impl std::ops::Deref for Database {
    type Target = MongoDatabase;

    fn deref(&self) -> &Self::Target {
        &self.database
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_database_config;

    #[tokio::test]
    #[ignore] // 需要 MongoDB 副本集
    async fn test_database_connection() {
        let config = test_database_config();
        let db = Database::connect(&config).await.unwrap();
        db.health_check().await.unwrap();
        db.close().await;
    }
}
