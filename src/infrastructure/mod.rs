//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`cache`] - Distributed cache abstraction (Redis and no-op implementations)

pub mod cache;
