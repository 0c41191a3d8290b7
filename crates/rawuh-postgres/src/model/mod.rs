//! Database models for all tables.

mod auth;
mod event;
mod guest;
mod project;
mod user;

pub use auth::{Auth, NewAuth};
pub use event::{Event, NewEvent, UpdateEvent};
pub use guest::{Guest, NewGuest, UpdateGuest};
pub use project::{NewProject, Project, UpdateProject};
pub use user::{NewUser, UpdateUser, User};
