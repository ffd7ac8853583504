//! HTTP API layer.
//!
//! # Modules
//!
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Authentication, authorization and tracing middleware

pub mod handlers;
pub mod middleware;
