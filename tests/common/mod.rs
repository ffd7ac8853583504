#![allow(dead_code)]

use async_trait::async_trait;
use auth_service::Bootstrap;
use auth_service::application::services::{
    AuthenticateResult, Authentication, AuthenticationHandler, Authorization,
};
use auth_service::config::Config;
use auth_service::domain::{Claim, NAME_CLAIM, Principal};
use auth_service::infrastructure::cache::NullCache;
use auth_service::state::AppState;
use axum::http::request::Parts;
use std::sync::Arc;

pub const TEST_SCHEME: &str = "TestHeader";

/// Authenticates requests carrying `X-Test-User` (and optionally
/// `X-Test-Role`). `X-Test-User: !` simulates rejected credentials.
pub struct HeaderScheme;

#[async_trait]
impl AuthenticationHandler for HeaderScheme {
    fn scheme(&self) -> String {
        TEST_SCHEME.to_string()
    }

    async fn authenticate(&self, parts: &Parts) -> AuthenticateResult {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        match header("x-test-user").as_deref() {
            None => AuthenticateResult::NoResult,
            Some("!") => AuthenticateResult::Fail("rejected test credentials".to_string()),
            Some(user) => {
                let mut claims = vec![Claim::new(NAME_CLAIM, user)];
                if let Some(role) = header("x-test-role") {
                    claims.push(Claim::new("role", role));
                }
                AuthenticateResult::Success(Principal::authenticated(TEST_SCHEME, claims))
            }
        }
    }
}

pub fn test_config() -> Config {
    Config {
        redis_connection: None,
        redis_instance_name: String::new(),
        listen_addr: "127.0.0.1:0".to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
    }
}

/// Bootstrap registered the way the shipped binary does it.
pub fn default_bootstrap() -> Bootstrap {
    Bootstrap::from_config(test_config())
        .register_authentication()
        .register_authorization()
        .register_distributed_cache(None)
}

/// State with the header scheme registered and the given authorization.
pub fn create_test_state(authorization: Authorization) -> AppState {
    let mut authentication = Authentication::new();
    authentication.add_scheme(Arc::new(HeaderScheme));

    AppState::new(authentication, authorization, Arc::new(NullCache::new()))
}
