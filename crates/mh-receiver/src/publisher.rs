//! Fan-out of received events

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Publish timed out after {0:?}")]
    Timeout(Duration),
}

/// Destination for raw webhook bodies
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, channel: &str, payload: &[u8]) -> Result<(), PublishError>;
}

/// Redis connection settings
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            password: None,
        }
    }
}

impl RedisConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn connection_info(&self) -> redis::ConnectionInfo {
        redis::ConnectionInfo {
            addr: redis::ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: redis::RedisConnectionInfo {
                password: self.password.clone().filter(|p| !p.is_empty()),
                ..Default::default()
            },
        }
    }
}

/// Publishes with Redis `PUBLISH`
pub struct RedisPublisher {
    conn: ConnectionManager,
    timeout: Duration,
}

impl RedisPublisher {
    /// Connect and verify the server answers `PING`
    pub async fn connect(config: &RedisConfig) -> Result<Self, PublishError> {
        let client = redis::Client::open(config.connection_info())?;

        let mut conn = tokio::time::timeout(DEFAULT_PUBLISH_TIMEOUT, ConnectionManager::new(client))
            .await
            .map_err(|_| PublishError::Timeout(DEFAULT_PUBLISH_TIMEOUT))??;

        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        info!(address = %config.address(), "Connected to Redis");

        Ok(Self {
            conn,
            timeout: DEFAULT_PUBLISH_TIMEOUT,
        })
    }
}

#[async_trait]
impl EventPublisher for RedisPublisher {
    async fn publish(&self, channel: &str, payload: &[u8]) -> Result<(), PublishError> {
        let mut conn = self.conn.clone();
        let publish = async move {
            let _receivers: i64 = conn.publish(channel, payload).await?;
            Ok::<_, PublishError>(())
        };

        tokio::time::timeout(self.timeout, publish)
            .await
            .map_err(|_| PublishError::Timeout(self.timeout))?
    }
}
