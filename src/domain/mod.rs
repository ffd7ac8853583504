//! Domain types shared by the application and API layers.
//!
//! # Modules
//!
//! - [`principal`] - Request identity and claims

pub mod principal;

pub use principal::{Claim, NAME_CLAIM, Principal};
