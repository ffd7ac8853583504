//! Application configuration loaded from the environment and command line.
//!
//! Configuration is read once at startup and never changes afterwards.
//! Sources, later overriding earlier:
//!
//! 1. `.env` file (loaded by `dotenvy` in [`crate::server::Bootstrap::initialize`])
//! 2. Process environment
//! 3. Command-line flags ([`Args`])
//!
//! ## Cache connection string
//!
//! Read from the `ConnectionStrings:RedisConnection` key. In the environment,
//! `:` is written as `__`:
//!
//! ```bash
//! export ConnectionStrings__RedisConnection="localhost:6379,password=secret"
//! ```
//!
//! Falls back to `REDIS_URL`, then to components:
//!
//! ```bash
//! export REDIS_HOST="localhost"
//! export REDIS_PORT="6379"
//! export REDIS_PASSWORD=""
//! export REDIS_DB="0"
//! ```
//!
//! The connection string is not validated here. An absent key does not
//! prevent startup.
//!
//! ## Optional Variables
//!
//! - `REDIS_INSTANCE_NAME` - Prefix for every cache key (default: empty)
//! - `LISTEN` - Bind address (default: `0.0.0.0:8080`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::Result;
use clap::Parser;
use std::env;

/// Environment variable names for `ConnectionStrings:RedisConnection`.
const REDIS_CONNECTION_KEYS: [&str; 2] = [
    "ConnectionStrings__RedisConnection",
    "CONNECTIONSTRINGS__REDISCONNECTION",
];

/// Command-line overrides.
#[derive(Debug, Default, Parser)]
#[command(name = "auth-service")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Cache connection string (`ConnectionStrings:RedisConnection`)
    #[arg(long = "redis-connection", value_name = "CONNECTION_STRING")]
    pub redis_connection: Option<String>,

    /// Prefix prepended to every cache key
    #[arg(long)]
    pub instance_name: Option<String>,

    /// Bind address, `host:port`
    #[arg(long)]
    pub listen: Option<String>,

    /// Tracing filter directive, e.g. `info` or `auth_service=debug`
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format: `text` or `json`
    #[arg(long)]
    pub log_format: Option<String>,
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// `ConnectionStrings:RedisConnection`. `None` when unset or empty.
    pub redis_connection: Option<String>,
    /// Cache key prefix.
    pub redis_instance_name: String,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Self {
        let redis_connection = Self::load_redis_connection();

        let redis_instance_name = env::var("REDIS_INSTANCE_NAME").unwrap_or_default();
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Self {
            redis_connection,
            redis_instance_name,
            listen_addr,
            log_level,
            log_format,
        }
    }

    /// Applies command-line overrides on top of the current values.
    pub fn apply_args(mut self, args: Args) -> Self {
        if let Some(connection) = args.redis_connection {
            self.redis_connection = Some(connection).filter(|c| !c.trim().is_empty());
        }
        if let Some(instance_name) = args.instance_name {
            self.redis_instance_name = instance_name;
        }
        if let Some(listen) = args.listen {
            self.listen_addr = listen;
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(log_format) = args.log_format {
            self.log_format = log_format;
        }
        self
    }

    /// Loads the cache connection string.
    ///
    /// Priority:
    /// 1. `ConnectionStrings__RedisConnection` (either casing)
    /// 2. `REDIS_URL`
    /// 3. Constructed from `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`, `REDIS_DB`
    ///
    /// Empty values count as unset. Returns `None` if nothing is configured.
    fn load_redis_connection() -> Option<String> {
        let non_empty = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());

        // Priority 1: the configuration key itself
        if let Some(value) = REDIS_CONNECTION_KEYS.iter().find_map(|key| non_empty(key)) {
            return Some(value);
        }

        // Priority 2: REDIS_URL
        if let Some(url) = non_empty("REDIS_URL") {
            return Some(url);
        }

        // Priority 3: Build from components (if REDIS_HOST is set)
        let host = non_empty("REDIS_HOST")?;
        let port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
        let password = env::var("REDIS_PASSWORD").ok();
        let db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

        let url = match password {
            // Empty password means no authentication
            Some(pwd) if !pwd.is_empty() => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
            _ => format!("redis://{}:{}/{}", host, port, db),
        };

        Some(url)
    }

    /// Validates the host settings.
    ///
    /// The cache connection string is deliberately left alone: a bad value
    /// only surfaces when the cache is first used.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not `host:port`
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        Ok(())
    }

    /// Returns whether a cache connection string is configured.
    pub fn is_cache_configured(&self) -> bool {
        self.redis_connection.is_some()
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);

        if let Some(ref connection) = self.redis_connection {
            tracing::info!("  Redis: {}", mask_connection_string(connection));
        } else {
            tracing::info!("  Redis: not configured");
        }

        if !self.redis_instance_name.is_empty() {
            tracing::info!("  Redis instance name: {}", self.redis_instance_name);
        }

        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Masks secrets in connection strings for logging.
///
/// Handles both URL and option-list forms:
/// - `redis://:password@host:port/db` → `redis://:***@host:port/db`
/// - `host:6379,password=secret,ssl=true` → `host:6379,password=***,ssl=true`
pub fn mask_connection_string(connection: &str) -> String {
    if let Some(start) = connection.find("://") {
        let scheme_end = start + 3;
        let rest = &connection[scheme_end..];

        if let Some(at_pos) = rest.rfind('@') {
            let credentials = &rest[..at_pos];
            let host_part = &rest[at_pos..];

            if let Some(colon_pos) = credentials.rfind(':') {
                let username = &credentials[..colon_pos];
                return format!("{}://{}:***{}", &connection[..start], username, host_part);
            }
        }

        return connection.to_string();
    }

    connection
        .split(',')
        .map(|token| match token.split_once('=') {
            Some((key, _)) if key.trim().eq_ignore_ascii_case("password") => {
                format!("{}=***", key)
            }
            _ => token.to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}
