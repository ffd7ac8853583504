//! HTTP request handlers.

pub mod root;

pub use root::{LIVENESS_MESSAGE, root_handler};
