//! Request types for HTTP handlers.

mod authentication;
mod events;
mod guests;
mod paths;
mod projects;
mod users;
mod validations;

pub use authentication::*;
pub use events::*;
pub use guests::*;
pub use paths::*;
pub use projects::*;
pub use users::*;
