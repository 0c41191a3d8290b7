//! Authentication and tenant authorization.
//!
//! - [`AuthClaims`]: identity stored in a session
//! - [`AuthHeader`], [`BearerToken`]: bearer token from the `Authorization` header
//! - [`Credentials`]: login credentials (Basic auth or JSON body)
//! - [`AuthState`]: claims attached to an authenticated request
//! - [`AuthProvider`]: tenant authorization over claims

mod auth_claims;
mod auth_header;
mod auth_provider;
mod auth_state;

pub use self::auth_claims::{AuthClaims, UserType};
pub use self::auth_header::{AuthHeader, BearerToken, Credentials};
pub use self::auth_provider::{AuthProvider, ResourceScope};
pub use self::auth_state::AuthState;
