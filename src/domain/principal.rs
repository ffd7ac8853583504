//! Request identity produced by the authentication middleware.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

/// Claim kind holding the principal's display name.
pub const NAME_CLAIM: &str = "name";

/// A single statement about a principal, e.g. `role = admin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub kind: String,
    pub value: String,
}

impl Claim {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// Identity attached to every request that passed the authentication layer.
///
/// A principal without a scheme is anonymous. With no authentication scheme
/// registered, every request carries the anonymous principal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Principal {
    scheme: Option<String>,
    claims: Vec<Claim>,
}

impl Principal {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Creates a principal authenticated by `scheme`.
    pub fn authenticated(scheme: impl Into<String>, claims: Vec<Claim>) -> Self {
        Self {
            scheme: Some(scheme.into()),
            claims,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.scheme.is_some()
    }

    /// Scheme that authenticated this principal, `None` when anonymous.
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Value of the first [`NAME_CLAIM`], if any.
    pub fn name(&self) -> Option<&str> {
        self.find_claim(NAME_CLAIM)
    }

    pub fn find_claim(&self, kind: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.value.as_str())
    }

    pub fn has_claim(&self, kind: &str, value: &str) -> bool {
        self.claims.iter().any(|c| c.kind == kind && c.value == value)
    }
}

/// Extracts the principal set by the authentication middleware.
///
/// Falls back to [`Principal::anonymous`] when the middleware did not run.
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Principal>()
            .cloned()
            .unwrap_or_default())
    }
}
