//! Handler for the liveness endpoint.

/// Body returned by `GET /`.
pub const LIVENESS_MESSAGE: &str = "Authentication Service Running";

/// Reports that the service is up.
///
/// # Endpoint
///
/// `GET /`
///
/// # Response
///
/// Always `200 OK` with `text/plain` body `Authentication Service Running`.
/// Headers and query parameters are ignored.
pub async fn root_handler() -> &'static str {
    LIVENESS_MESSAGE
}
