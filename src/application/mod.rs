//! Application layer services.
//!
//! # Available Services
//!
//! - [`services::authentication::Authentication`] - Authentication scheme registry
//! - [`services::authorization::Authorization`] - Authorization policy registry

pub mod services;
