//! Request extractors.
//!
//! ## Authentication & Authorization
//!
//! - [`AuthState`]: claims of the authenticated caller
//! - [`AuthHeader`]: bearer token from the `Authorization` header
//! - [`Credentials`]: login credentials
//! - [`AuthProvider`]: tenant authorization
//!
//! ## Request Data Extraction
//!
//! - [`Json`], [`ValidateJson`], [`Path`], [`Query`]: axum extractors with
//!   the common error body on rejection
//! - [`ListQuery`]: filter, sort and pagination for list endpoints
//!
//! ## Storage
//!
//! - [`Database`]: connection pool with the per-call timeout

pub mod auth;
mod database;
mod list_query;
pub mod reject;

pub use crate::extract::auth::{
    AuthClaims, AuthHeader, AuthProvider, AuthState, BearerToken, Credentials, ResourceScope,
    UserType,
};
pub use crate::extract::database::Database;
pub use crate::extract::list_query::{ListParams, ListQuery};
pub use crate::extract::reject::{Json, Path, Query, ValidateJson};
pub use crate::{TRACING_TARGET_AUTHENTICATION, TRACING_TARGET_AUTHORIZATION, authorize};
