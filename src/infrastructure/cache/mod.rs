//! Distributed cache client.
//!
//! Provides a [`DistributedCache`] trait with two implementations:
//! - [`RedisCache`] - Redis-backed cache, connected on first use
//! - [`NullCache`] - No-op implementation when no connection string is configured

pub mod connection_string;
mod null_cache;
mod redis_cache;
mod service;

pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, DistributedCache};
