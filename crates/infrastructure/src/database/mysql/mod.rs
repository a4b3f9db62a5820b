mod mysql_assignment_repository;

pub use mysql_assignment_repository::MySqlAssignmentRepository;

use std::time::Duration;

use assignment_consumer_config::DatabaseConfig;
use assignment_consumer_core::{ConsumerError, ConsumerResult};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::info;

/// 创建MySQL连接池，连接失败直接返回错误
pub async fn create_pool(config: &DatabaseConfig) -> ConsumerResult<MySqlPool> {
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
        .connect(&config.url)
        .await
        .map_err(ConsumerError::Database)?;

    info!(max_connections = config.max_connections, "数据库连接池创建成功");
    Ok(pool)
}
