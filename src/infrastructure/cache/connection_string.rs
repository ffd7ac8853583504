//! Conversion of cache connection strings into Redis URLs.
//!
//! Two formats are accepted:
//!
//! - Redis URLs: `redis://`, `rediss://`, `unix://`, `redis+unix://`. Passed through unchanged.
//! - Comma-separated endpoint/option lists as used by .NET Redis clients:
//!
//! ```text
//! cache.internal:6380,password=secret,ssl=true,defaultDatabase=2,abortConnect=false
//! ```
//!
//! Only the first endpoint is used. Recognised options are `user`, `password`,
//! `ssl` and `defaultDatabase` (case-insensitive); others are ignored.

use tracing::debug;
use url::Url;

use super::service::{CacheError, CacheResult};

const DEFAULT_PORT: u16 = 6379;

const URL_SCHEMES: [&str; 4] = ["redis://", "rediss://", "unix://", "redis+unix://"];

#[derive(Debug, Default)]
struct EndpointOptions {
    user: Option<String>,
    password: Option<String>,
    ssl: bool,
    database: u32,
}

impl EndpointOptions {
    fn apply(&mut self, key: &str, value: &str) -> CacheResult<()> {
        match key.to_ascii_lowercase().as_str() {
            "user" => self.user = Some(value.to_string()).filter(|v| !v.is_empty()),
            "password" => self.password = Some(value.to_string()).filter(|v| !v.is_empty()),
            "ssl" => self.ssl = value.eq_ignore_ascii_case("true"),
            "defaultdatabase" => {
                self.database = value.parse().map_err(|_| {
                    CacheError::Configuration(format!("invalid defaultDatabase '{}'", value))
                })?;
            }
            other => debug!("Ignoring cache connection option '{}'", other),
        }
        Ok(())
    }
}

/// Converts a connection string into a URL accepted by [`redis::Client::open`].
///
/// # Errors
///
/// Returns [`CacheError::Configuration`] if the string is empty, names an
/// unsupported URL scheme, has no endpoint, or carries an unparsable port or
/// database number.
pub fn to_redis_url(connection_string: &str) -> CacheResult<String> {
    let raw = connection_string.trim();

    if raw.is_empty() {
        return Err(CacheError::Configuration(
            "connection string is empty".to_string(),
        ));
    }

    if URL_SCHEMES.iter().any(|scheme| raw.starts_with(scheme)) {
        return Ok(raw.to_string());
    }

    if raw.contains("://") {
        return Err(CacheError::Configuration(
            "unsupported connection string scheme".to_string(),
        ));
    }

    let mut endpoints = Vec::new();
    let mut options = EndpointOptions::default();

    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.split_once('=') {
            Some((key, value)) => options.apply(key.trim(), value.trim())?,
            None => endpoints.push(token),
        }
    }

    let endpoint = endpoints.first().ok_or_else(|| {
        CacheError::Configuration("connection string has no endpoint".to_string())
    })?;

    if endpoints.len() > 1 {
        debug!(
            "Connection string lists {} endpoints, using {}",
            endpoints.len(),
            endpoint
        );
    }

    let (host, port) = split_endpoint(endpoint)?;
    let scheme = if options.ssl { "rediss" } else { "redis" };

    let mut url = Url::parse(&format!("{}://{}:{}/{}", scheme, host, port, options.database))
        .map_err(|e| CacheError::Configuration(format!("invalid endpoint '{}': {}", endpoint, e)))?;

    if let Some(user) = &options.user {
        url.set_username(user)
            .map_err(|_| CacheError::Configuration("invalid user".to_string()))?;
    }

    if let Some(password) = &options.password {
        url.set_password(Some(password))
            .map_err(|_| CacheError::Configuration("invalid password".to_string()))?;
    }

    Ok(url.to_string())
}

/// Splits `host[:port]`, keeping brackets around IPv6 literals.
fn split_endpoint(endpoint: &str) -> CacheResult<(&str, u16)> {
    let (host, port) = if endpoint.starts_with('[') {
        let close = endpoint.find(']').ok_or_else(|| {
            CacheError::Configuration(format!("invalid endpoint '{}'", endpoint))
        })?;
        let (host, tail) = endpoint.split_at(close + 1);
        match tail.strip_prefix(':') {
            Some(port) => (host, Some(port)),
            None if tail.is_empty() => (host, None),
            None => {
                return Err(CacheError::Configuration(format!(
                    "invalid endpoint '{}'",
                    endpoint
                )));
            }
        }
    } else {
        match endpoint.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (endpoint, None),
        }
    };

    if host.is_empty() {
        return Err(CacheError::Configuration(format!(
            "endpoint '{}' has no host",
            endpoint
        )));
    }

    let port = match port {
        Some(port) => port
            .parse()
            .map_err(|_| CacheError::Configuration(format!("invalid port '{}'", port)))?,
        None => DEFAULT_PORT,
    };

    Ok((host, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_urls_pass_through() {
        assert_eq!(
            to_redis_url("redis://localhost:6379/1").unwrap(),
            "redis://localhost:6379/1"
        );
        assert_eq!(
            to_redis_url("  rediss://:pw@cache:6380/0 ").unwrap(),
            "rediss://:pw@cache:6380/0"
        );
        assert_eq!(
            to_redis_url("unix:///tmp/redis.sock").unwrap(),
            "unix:///tmp/redis.sock"
        );
    }

    #[test]
    fn test_bare_host_uses_defaults() {
        assert_eq!(to_redis_url("localhost").unwrap(), "redis://localhost:6379/0");
    }

    #[test]
    fn test_host_port_with_password_and_database() {
        assert_eq!(
            to_redis_url("cache.internal:6380,password=secret,defaultDatabase=2").unwrap(),
            "redis://:secret@cache.internal:6380/2"
        );
    }

    #[test]
    fn test_ssl_user_and_unknown_options() {
        assert_eq!(
            to_redis_url("cache.internal:6380,ssl=True,abortConnect=False,user=svc,password=pw")
                .unwrap(),
            "rediss://svc:pw@cache.internal:6380/0"
        );
    }

    #[test]
    fn test_option_keys_are_case_insensitive() {
        assert_eq!(
            to_redis_url("cache:6379,PASSWORD=secret,DefaultDatabase=3").unwrap(),
            "redis://:secret@cache:6379/3"
        );
    }

    #[test]
    fn test_empty_password_means_no_auth() {
        assert_eq!(
            to_redis_url("cache:6379,password=").unwrap(),
            "redis://cache:6379/0"
        );
    }

    #[test]
    fn test_first_endpoint_wins() {
        assert_eq!(
            to_redis_url("primary:6379,replica:6380").unwrap(),
            "redis://primary:6379/0"
        );
    }

    #[test]
    fn test_ipv6_endpoint() {
        assert_eq!(to_redis_url("[::1]:6380").unwrap(), "redis://[::1]:6380/0");
    }

    #[test]
    fn test_invalid_connection_strings() {
        for input in [
            "",
            "   ",
            "password=secret",
            "cache:notaport",
            "cache:6379,defaultDatabase=abc",
            ":6379",
            "http://cache:6379",
            "[::1",
        ] {
            assert!(
                matches!(to_redis_url(input), Err(CacheError::Configuration(_))),
                "expected configuration error for {:?}",
                input
            );
        }
    }
}
