//! Authorization policy registry and evaluation.

use serde_json::json;
use std::collections::HashMap;

use crate::domain::Principal;
use crate::error::AppError;

/// A single condition a principal must meet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// The principal was authenticated by some scheme.
    Authenticated,
    /// The principal carries a claim of `kind`; when `allowed` is non-empty
    /// its value must be one of them.
    Claim { kind: String, allowed: Vec<String> },
    /// The principal's name is one of the given names.
    Name(Vec<String>),
}

impl Requirement {
    fn is_satisfied_by(&self, principal: &Principal) -> bool {
        match self {
            Requirement::Authenticated => principal.is_authenticated(),
            Requirement::Claim { kind, allowed } => principal
                .claims()
                .iter()
                .filter(|c| &c.kind == kind)
                .any(|c| allowed.is_empty() || allowed.contains(&c.value)),
            Requirement::Name(names) => principal
                .name()
                .is_some_and(|name| names.iter().any(|n| n == name)),
        }
    }
}

/// A set of requirements that must all hold. An empty policy always passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationPolicy {
    requirements: Vec<Requirement>,
}

impl AuthorizationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_authenticated_user(mut self) -> Self {
        self.requirements.push(Requirement::Authenticated);
        self
    }

    pub fn require_claim<I, V>(mut self, kind: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.requirements.push(Requirement::Claim {
            kind: kind.into(),
            allowed: allowed.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn require_name<I, V>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.requirements
            .push(Requirement::Name(names.into_iter().map(Into::into).collect()));
        self
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn is_satisfied_by(&self, principal: &Principal) -> bool {
        self.requirements
            .iter()
            .all(|r| r.is_satisfied_by(principal))
    }
}

/// Registered authorization policies.
///
/// [`Authorization::default`] holds no policies and no fallback policy, so
/// every request is allowed through.
#[derive(Debug, Clone, Default)]
pub struct Authorization {
    policies: HashMap<String, AuthorizationPolicy>,
    fallback_policy: Option<AuthorizationPolicy>,
}

impl Authorization {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_policy(
        &mut self,
        name: impl Into<String>,
        policy: AuthorizationPolicy,
    ) -> &mut Self {
        self.policies.insert(name.into(), policy);
        self
    }

    /// Policy applied to every request by the global authorization layer.
    pub fn set_fallback_policy(&mut self, policy: AuthorizationPolicy) -> &mut Self {
        self.fallback_policy = Some(policy);
        self
    }

    pub fn policy(&self, name: &str) -> Option<&AuthorizationPolicy> {
        self.policies.get(name)
    }

    pub fn policy_count(&self) -> usize {
        self.policies.len()
    }

    /// Evaluates the fallback policy. Passes when none is set.
    pub fn authorize_fallback(&self, principal: &Principal) -> Result<(), AppError> {
        match &self.fallback_policy {
            Some(policy) => evaluate(policy, principal),
            None => Ok(()),
        }
    }

    /// Evaluates a named policy.
    ///
    /// # Errors
    ///
    /// - [`AppError::Internal`] if no policy with that name is registered
    /// - [`AppError::Unauthorized`] if the policy fails for an anonymous principal
    /// - [`AppError::Forbidden`] if the policy fails for an authenticated principal
    pub fn authorize(&self, policy_name: &str, principal: &Principal) -> Result<(), AppError> {
        let policy = self.policy(policy_name).ok_or_else(|| {
            AppError::internal(
                "Authorization policy is not registered",
                json!({ "policy": policy_name }),
            )
        })?;

        evaluate(policy, principal)
    }
}

fn evaluate(policy: &AuthorizationPolicy, principal: &Principal) -> Result<(), AppError> {
    if policy.is_satisfied_by(principal) {
        return Ok(());
    }

    if principal.is_authenticated() {
        Err(AppError::forbidden(
            "Forbidden",
            json!({ "reason": "Principal does not satisfy the authorization policy" }),
        ))
    } else {
        Err(AppError::unauthorized(
            "Unauthorized",
            json!({ "reason": "Authentication is required" }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Claim, NAME_CLAIM};

    fn alice() -> Principal {
        Principal::authenticated(
            "Test",
            vec![Claim::new(NAME_CLAIM, "alice"), Claim::new("role", "admin")],
        )
    }

    #[test]
    fn test_default_authorization_allows_everything() {
        let authorization = Authorization::new();

        assert_eq!(authorization.policy_count(), 0);
        assert!(
            authorization
                .authorize_fallback(&Principal::anonymous())
                .is_ok()
        );
    }

    #[test]
    fn test_empty_policy_passes() {
        let policy = AuthorizationPolicy::new();
        assert!(policy.is_satisfied_by(&Principal::anonymous()));
    }

    #[test]
    fn test_unknown_policy_is_internal_error() {
        let authorization = Authorization::new();

        let result = authorization.authorize("missing", &alice());

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[test]
    fn test_anonymous_failure_is_unauthorized() {
        let mut authorization = Authorization::new();
        authorization.add_policy(
            "signed-in",
            AuthorizationPolicy::new().require_authenticated_user(),
        );

        let result = authorization.authorize("signed-in", &Principal::anonymous());

        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
        assert!(authorization.authorize("signed-in", &alice()).is_ok());
    }

    #[test]
    fn test_authenticated_failure_is_forbidden() {
        let mut authorization = Authorization::new();
        authorization.add_policy(
            "owners",
            AuthorizationPolicy::new().require_claim("role", ["owner"]),
        );

        let result = authorization.authorize("owners", &alice());

        assert!(matches!(result, Err(AppError::Forbidden { .. })));
    }

    #[test]
    fn test_claim_requirement_without_values_checks_presence() {
        let policy = AuthorizationPolicy::new().require_claim("role", Vec::<String>::new());

        assert!(policy.is_satisfied_by(&alice()));
        assert!(!policy.is_satisfied_by(&Principal::authenticated("Test", vec![])));
    }

    #[test]
    fn test_claim_requirement_matches_any_allowed_value() {
        let policy = AuthorizationPolicy::new().require_claim("role", ["editor", "admin"]);
        assert!(policy.is_satisfied_by(&alice()));
    }

    #[test]
    fn test_name_requirement() {
        let policy = AuthorizationPolicy::new().require_name(["alice", "bob"]);

        assert!(policy.is_satisfied_by(&alice()));
        assert!(!policy.is_satisfied_by(&Principal::anonymous()));
    }

    #[test]
    fn test_all_requirements_must_hold() {
        let policy = AuthorizationPolicy::new()
            .require_authenticated_user()
            .require_claim("role", ["admin"])
            .require_name(["bob"]);

        assert_eq!(policy.requirements().len(), 3);
        assert!(!policy.is_satisfied_by(&alice()));
    }

    #[test]
    fn test_fallback_policy_is_evaluated() {
        let mut authorization = Authorization::new();
        authorization.set_fallback_policy(AuthorizationPolicy::new().require_authenticated_user());

        assert!(matches!(
            authorization.authorize_fallback(&Principal::anonymous()),
            Err(AppError::Unauthorized { .. })
        ));
        assert!(authorization.authorize_fallback(&alice()).is_ok());
    }
}
