use std::sync::Arc;

use crate::application::services::{Authentication, Authorization};
use crate::infrastructure::cache::DistributedCache;

/// Shared state handed to every middleware and handler.
#[derive(Clone)]
pub struct AppState {
    pub authentication: Arc<Authentication>,
    pub authorization: Arc<Authorization>,
    pub cache: Arc<dyn DistributedCache>,
}

impl AppState {
    pub fn new(
        authentication: Authentication,
        authorization: Authorization,
        cache: Arc<dyn DistributedCache>,
    ) -> Self {
        Self {
            authentication: Arc::new(authentication),
            authorization: Arc::new(authorization),
            cache,
        }
    }
}
