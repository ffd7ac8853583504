//! Distributed cache trait and error types.

use async_trait::async_trait;
use std::time::Duration;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The connection string could not be turned into a Redis endpoint.
    #[error("Cache configuration error: {0}")]
    Configuration(String),
    #[error("Cache connection error: {0}")]
    Connection(String),
    #[error("Cache operation error: {0}")]
    Operation(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value cache shared between service instances.
///
/// Values are opaque bytes. Implementations must be thread-safe.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed, connects on first use
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation when no connection string is configured
#[async_trait]
pub trait DistributedCache: Send + Sync {
    /// Reads a value.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(bytes))` on hit
    /// - `Ok(None)` on miss
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Stores a value, expiring after `ttl` when given.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<()>;

    async fn remove(&self, key: &str) -> CacheResult<()>;

    /// Checks if the cache backend is reachable.
    async fn health_check(&self) -> bool;
}
