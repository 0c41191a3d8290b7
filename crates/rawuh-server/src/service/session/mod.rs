//! Bearer token sessions.

mod backend;
mod clock;
mod store;

pub use backend::SessionBackend;
#[cfg(test)]
pub(crate) use backend::{FailingBackend, MemorySessionBackend};
#[cfg(test)]
pub(crate) use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use store::SessionStore;
