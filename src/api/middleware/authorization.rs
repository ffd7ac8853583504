//! Authorization middleware.
//!
//! Two entry points:
//!
//! - [`layer`] - global, evaluates the fallback policy for every request
//! - [`guard`] - per-route, evaluates a named policy chosen with [`require`]

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::domain::Principal;
use crate::error::AppError;
use crate::state::AppState;

/// Evaluates the fallback policy against the request principal.
///
/// Must run after [`super::authentication::layer`]. With no fallback policy
/// registered every request passes.
///
/// # Errors
///
/// - `401 Unauthorized` if the policy fails for an anonymous principal;
///   `WWW-Authenticate` names the default scheme when one exists
/// - `403 Forbidden` if the policy fails for an authenticated principal
pub async fn layer(
    State(st): State<AppState>,
    principal: Principal,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    st.authorization
        .authorize_fallback(&principal)
        .map_err(|e| e.with_challenge(st.authentication.default_scheme()))?;

    Ok(next.run(req).await)
}

/// State for [`guard`]: the application state plus the policy to enforce.
#[derive(Clone)]
pub struct PolicyGuard {
    state: AppState,
    policy: Arc<str>,
}

/// Selects the named policy a route requires.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, middleware, routing::get};
/// use crate::api::middleware::authorization;
///
/// let admin = Router::new()
///     .route("/admin", get(admin_handler))
///     .route_layer(middleware::from_fn_with_state(
///         authorization::require(&state, "admins"),
///         authorization::guard,
///     ));
/// ```
pub fn require(state: &AppState, policy: &str) -> PolicyGuard {
    PolicyGuard {
        state: state.clone(),
        policy: Arc::from(policy),
    }
}

/// Evaluates the policy selected with [`require`].
///
/// # Errors
///
/// - `401 Unauthorized` / `403 Forbidden` as for [`layer`]
/// - `500 Internal Server Error` if the policy is not registered
pub async fn guard(
    State(guard): State<PolicyGuard>,
    principal: Principal,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let st = &guard.state;

    st.authorization
        .authorize(&guard.policy, &principal)
        .map_err(|e| e.with_challenge(st.authentication.default_scheme()))?;

    Ok(next.run(req).await)
}
