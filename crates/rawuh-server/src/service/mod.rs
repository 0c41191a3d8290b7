//! Application state, configuration and the collaborators handlers depend on.

mod config;
mod limits;
mod security;
mod session;
mod state;

pub use crate::service::config::ServiceConfig;
pub use crate::service::limits::ServiceLimits;
pub use crate::service::security::{CipherError, KEY_SIZE, PasswordCipher, constant_time_eq};
#[cfg(test)]
pub(crate) use crate::service::session::{FailingBackend, ManualClock, MemorySessionBackend};
pub use crate::service::session::{Clock, SessionBackend, SessionStore, SystemClock};
pub use crate::service::state::ServiceState;
// Re-export error types from crate root for convenience
pub use crate::{Error as ServiceError, Result};
