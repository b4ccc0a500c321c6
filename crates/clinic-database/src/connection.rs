//! 数据库连接管理
//!
//! 每个操作独立建立连接，用完即关闭，不做连接池、不重试。

use async_trait::async_trait;
use clinic_core::DatabaseSettings;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::Connection;
use tracing::{debug, error, warn};

/// 单次使用的数据库连接提供者
///
/// `acquire` 失败时记录错误并返回 `None`，不向上抛出。
/// 调用方在所有退出路径上都必须把连接交还给 `release`。
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    /// 打开一个新连接
    async fn acquire(&self) -> Option<MySqlConnection>;

    /// 关闭连接
    async fn release(&self, conn: MySqlConnection);
}

/// 基于配置直连 MySQL 的连接提供者
pub struct MySqlConnectionProvider {
    options: MySqlConnectOptions,
}

impl MySqlConnectionProvider {
    pub fn new(settings: &DatabaseSettings) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .password(&settings.password)
            .database(&settings.name);

        Self { options }
    }
}

#[async_trait]
impl ConnectionProvider for MySqlConnectionProvider {
    async fn acquire(&self) -> Option<MySqlConnection> {
        match MySqlConnection::connect_with(&self.options).await {
            Ok(conn) => {
                debug!("Database connection opened");
                Some(conn)
            }
            Err(e) => {
                error!("Database connection error: {}", e);
                None
            }
        }
    }

    async fn release(&self, conn: MySqlConnection) {
        if let Err(e) = conn.close().await {
            warn!("Failed to close database connection: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_yields_no_connection() {
        let settings = DatabaseSettings {
            host: "127.0.0.1".to_string(),
            port: 1,
            user: "clinic".to_string(),
            password: "secret".to_string(),
            name: "healthcare_system".to_string(),
        };

        let provider = MySqlConnectionProvider::new(&settings);
        assert!(provider.acquire().await.is_none());
    }
}
