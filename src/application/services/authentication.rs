//! Authentication scheme registry.

use async_trait::async_trait;
use axum::http::request::Parts;
use std::sync::Arc;
use tracing::debug;

use crate::domain::Principal;

/// Outcome of running an authentication scheme against a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticateResult {
    /// The request carries nothing this scheme understands.
    NoResult,
    Success(Principal),
    /// The request carried credentials for this scheme but they were rejected.
    Fail(String),
}

/// A pluggable authentication scheme.
///
/// Implementations inspect request parts (headers, URI, extensions) and
/// produce a [`Principal`]. They must not consume the body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthenticationHandler: Send + Sync {
    /// Scheme name, also advertised in `WWW-Authenticate` challenges.
    fn scheme(&self) -> String;

    async fn authenticate(&self, parts: &Parts) -> AuthenticateResult;
}

/// Registered authentication schemes.
///
/// [`Authentication::default`] has no schemes: every request resolves to the
/// anonymous principal and no credential is ever verified.
#[derive(Default, Clone)]
pub struct Authentication {
    handlers: Vec<Arc<dyn AuthenticationHandler>>,
    default_scheme: Option<String>,
}

impl Authentication {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a scheme. Later registrations with the same name replace
    /// earlier ones.
    pub fn add_scheme(&mut self, handler: Arc<dyn AuthenticationHandler>) -> &mut Self {
        let scheme = handler.scheme();
        self.handlers.retain(|h| h.scheme() != scheme);
        self.handlers.push(handler);
        self
    }

    /// Chooses the scheme run by the middleware.
    pub fn set_default_scheme(&mut self, scheme: impl Into<String>) -> &mut Self {
        self.default_scheme = Some(scheme.into());
        self
    }

    pub fn schemes(&self) -> Vec<String> {
        self.handlers.iter().map(|h| h.scheme()).collect()
    }

    /// Effective default scheme.
    ///
    /// The explicitly chosen scheme, otherwise the only registered scheme,
    /// otherwise `None`.
    pub fn default_scheme(&self) -> Option<String> {
        if let Some(scheme) = &self.default_scheme {
            return Some(scheme.clone());
        }

        match self.handlers.as_slice() {
            [only] => Some(only.scheme()),
            _ => None,
        }
    }

    fn handler(&self, scheme: &str) -> Option<&Arc<dyn AuthenticationHandler>> {
        self.handlers.iter().find(|h| h.scheme() == scheme)
    }

    /// Resolves the principal for a request using the default scheme.
    ///
    /// Never rejects: a missing scheme, `NoResult` and `Fail` all yield the
    /// anonymous principal. Rejection is left to authorization.
    pub async fn authenticate(&self, parts: &Parts) -> Principal {
        let Some(scheme) = self.default_scheme() else {
            return Principal::anonymous();
        };

        let Some(handler) = self.handler(&scheme) else {
            debug!("Default authentication scheme '{}' is not registered", scheme);
            return Principal::anonymous();
        };

        match handler.authenticate(parts).await {
            AuthenticateResult::Success(principal) => {
                debug!("Authenticated request with scheme '{}'", scheme);
                principal
            }
            AuthenticateResult::NoResult => Principal::anonymous(),
            AuthenticateResult::Fail(reason) => {
                debug!("Authentication scheme '{}' failed: {}", scheme, reason);
                Principal::anonymous()
            }
        }
    }
}
