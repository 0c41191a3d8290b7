//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - [`authenticate`] and [`require_authentication`]: session lookup and the
//!   access gate in front of protected routes
//! - [`RouterSecurityExt`]: CORS, security headers and body limits
//! - [`RouterObservabilityExt`]: request ids and request tracing
//! - [`RouterRecoveryExt`]: panics, timeouts and service errors
//! - [`RouterOpenApiExt`]: OpenAPI document and Scalar UI

mod authentication;
mod observability;
mod recovery;
mod security;
mod specification;

pub use authentication::{authenticate, require_authentication};
pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{
    CorsConfig, DEFAULT_MAX_BODY_SIZE, FrameOptions, ReferrerPolicy, RouterSecurityExt,
    SecurityHeadersConfig,
};
pub use specification::{OpenApiConfig, RouterOpenApiExt};
