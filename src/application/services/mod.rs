pub mod authentication;
pub mod authorization;

pub use authentication::{AuthenticateResult, Authentication, AuthenticationHandler};
pub use authorization::{Authorization, AuthorizationPolicy, Requirement};
