//! # Auth Service
//!
//! Bootstrap for an authentication service built with Axum and Redis.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Request identity ([`domain::Principal`])
//! - **Application Layer** ([`application`]) - Authentication schemes and authorization policies
//! - **Infrastructure Layer** ([`infrastructure`]) - Distributed cache client
//! - **API Layer** ([`api`]) - Handlers and middleware
//!
//! ## Features
//!
//! - Authentication and authorization pipeline, registered with no schemes
//!   and no policies
//! - Redis cache client configured from `ConnectionStrings:RedisConnection`,
//!   connected lazily on first use
//! - Liveness endpoint `GET /`
//! - Structured request tracing, text or JSON logs
//!
//! ## Quick Start
//!
//! ```bash
//! export ConnectionStrings__RedisConnection="localhost:6379"  # Optional
//! cargo run
//! curl http://localhost:8080/
//! ```
//!
//! ## Configuration
//!
//! Loaded from `.env`, the environment and command-line flags via
//! [`config::Config`]. See [`config`] for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use server::Bootstrap;
pub use state::AppState;

/// Commonly used types for external consumers.
pub mod prelude {
    pub use crate::application::services::{
        AuthenticateResult, Authentication, AuthenticationHandler, Authorization,
        AuthorizationPolicy,
    };
    pub use crate::domain::{Claim, Principal};
    pub use crate::error::AppError;
    pub use crate::infrastructure::cache::DistributedCache;
    pub use crate::server::Bootstrap;
    pub use crate::state::AppState;
}
