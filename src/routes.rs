//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /` - Liveness message (public)
//!
//! Unknown paths fall through to axum's default `404 Not Found`; other
//! methods on `/` get `405 Method Not Allowed`.
//!
//! # Middleware
//!
//! Outermost first:
//!
//! 1. **Tracing** - Request span and response logging
//! 2. **Authentication** - Attaches the request [`crate::domain::Principal`]
//! 3. **Authorization** - Evaluates the fallback policy

use crate::api::handlers::root_handler;
use crate::api::middleware::{authentication, authorization, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        // Layers wrap outward: the last one added runs first.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authorization::layer,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authentication::layer,
        ))
        .layer(tracing::layer())
        .with_state(state)
}
