//! Authentication middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Resolves the request principal and stores it in request extensions.
///
/// Runs the default scheme of [`crate::application::services::Authentication`].
/// Never rejects: with no scheme registered, or when the scheme yields no
/// result or fails, the anonymous principal is attached and the request
/// continues. Handlers read it with the [`crate::domain::Principal`] extractor.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, middleware};
/// use crate::api::middleware::authentication;
///
/// let app = Router::new()
///     .route("/", get(root_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), authentication::layer));
/// ```
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let principal = st.authentication.authenticate(&parts).await;
    parts.extensions.insert(principal);

    next.run(Request::from_parts(parts, body)).await
}
