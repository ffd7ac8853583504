//! Redis-backed distributed cache.

use super::connection_string::to_redis_url;
use super::service::{CacheError, CacheResult, DistributedCache};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Redis cache client bound to a connection string.
///
/// Construction never touches the network and never parses the connection
/// string. The first operation parses it, opens the client and establishes a
/// `ConnectionManager`, which is then reused by every later call. A failed
/// first attempt is retried on the next operation.
pub struct RedisCache {
    connection_string: String,
    instance_name: String,
    manager: OnceCell<ConnectionManager>,
}

impl RedisCache {
    /// Creates a lazily connected cache client.
    ///
    /// # Arguments
    ///
    /// - `connection_string` - Redis URL or comma-separated endpoint list
    ///   (see [`super::connection_string`])
    /// - `instance_name` - prefix prepended to every key; may be empty
    pub fn new(connection_string: impl Into<String>, instance_name: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            instance_name: instance_name.into(),
            manager: OnceCell::new(),
        }
    }

    /// Whether a connection has been established yet.
    pub fn is_connected(&self) -> bool {
        self.manager.initialized()
    }

    /// Constructs the full Redis key with the instance prefix.
    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.instance_name, key)
    }

    async fn connection(&self) -> CacheResult<ConnectionManager> {
        let manager = self
            .manager
            .get_or_try_init(|| async {
                let client = open_client(&self.connection_string)?;

                let manager = ConnectionManager::new(client).await.map_err(|e| {
                    CacheError::Connection(format!("Failed to connect to Redis: {}", e))
                })?;

                info!("✓ Connected to Redis");
                Ok::<_, CacheError>(manager)
            })
            .await?;

        Ok(manager.clone())
    }
}

/// Parses the connection string and opens a client without connecting.
///
/// `rediss://` (or `ssl=true`) endpoints use rustls; the process-wide crypto
/// provider is installed on first need.
fn open_client(connection_string: &str) -> CacheResult<Client> {
    let url = to_redis_url(connection_string)?;

    if url.starts_with("rediss://") {
        // Err means a provider is already installed.
        let _ = rustls::crypto::ring::default_provider().install_default();
    }

    Client::open(url.as_str())
        .map_err(|e| CacheError::Connection(format!("Failed to create Redis client: {}", e)))
}

#[async_trait]
impl DistributedCache for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let full_key = self.build_key(key);
        let mut conn = self.connection().await?;

        let value = conn
            .get::<_, Option<Vec<u8>>>(&full_key)
            .await
            .map_err(|e| CacheError::Operation(format!("GET {} failed: {}", full_key, e)))?;

        match &value {
            Some(_) => debug!("Cache HIT: {}", full_key),
            None => debug!("Cache MISS: {}", full_key),
        }

        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<()> {
        let full_key = self.build_key(key);
        let mut conn = self.connection().await?;

        let result = match ttl {
            Some(ttl) => {
                // SETEX rejects a zero expiry.
                let seconds = ttl.as_secs().max(1);
                conn.set_ex::<_, _, ()>(&full_key, value, seconds).await
            }
            None => conn.set::<_, _, ()>(&full_key, value).await,
        };

        result.map_err(|e| CacheError::Operation(format!("SET {} failed: {}", full_key, e)))?;

        debug!("Cache SET: {} (TTL: {:?})", full_key, ttl);
        Ok(())
    }

    async fn remove(&self, key: &str) -> CacheResult<()> {
        let full_key = self.build_key(key);
        let mut conn = self.connection().await?;

        let deleted = conn
            .del::<_, i32>(&full_key)
            .await
            .map_err(|e| CacheError::Operation(format!("DEL {} failed: {}", full_key, e)))?;

        if deleted > 0 {
            debug!("Cache REMOVE: {}", full_key);
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        match self.connection().await {
            Ok(mut conn) => conn.ping::<()>().await.is_ok(),
            Err(e) => {
                warn!("Redis health check failed: {}", e);
                false
            }
        }
    }
}
