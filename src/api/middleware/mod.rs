//! HTTP middleware for request processing.
//!
//! Provides authentication, authorization, and observability middleware.

pub mod authentication;
pub mod authorization;
pub mod tracing;
