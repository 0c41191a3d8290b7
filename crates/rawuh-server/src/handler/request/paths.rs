//! Path parameters.
//!
//! Identifiers are kept as the raw strings from the URL. They are compared
//! against the caller's claims first and only parsed afterwards, so a value
//! that does not parse is an internal error rather than a client error.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::handler::{ErrorKind, Result};

/// Parses an identifier that already passed authorization.
fn parse_id(resource: &'static str, raw: &str) -> Result<i64> {
    raw.parse().map_err(|_| {
        ErrorKind::InternalServerError
            .with_message("malformed identifier")
            .with_context(format!("{resource} is not an integer"))
            .with_resource(resource)
    })
}

/// `Path` param for `{project_id}` handlers.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProjectPathParams {
    /// ID of the project.
    pub project_id: String,
}

impl ProjectPathParams {
    pub fn project_id(&self) -> Result<i64> {
        parse_id("project_id", &self.project_id)
    }
}

/// `Path` param for `{project_id}/events/{event_id}` handlers.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EventPathParams {
    /// ID of the project.
    pub project_id: String,
    /// ID of the event.
    pub event_id: String,
}

impl EventPathParams {
    /// Returns the parsed `(project_id, event_id)` pair.
    pub fn ids(&self) -> Result<(i64, i64)> {
        Ok((
            parse_id("project_id", &self.project_id)?,
            parse_id("event_id", &self.event_id)?,
        ))
    }
}

/// `Path` param for `{project_id}/events/{event_id}/guests/{guest_id}` handlers.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GuestPathParams {
    /// ID of the project.
    pub project_id: String,
    /// ID of the event.
    pub event_id: String,
    /// ID of the guest.
    pub guest_id: String,
}

impl GuestPathParams {
    /// Returns the parsed `(project_id, event_id, guest_id)` triple.
    pub fn ids(&self) -> Result<(i64, i64, i64)> {
        Ok((
            parse_id("project_id", &self.project_id)?,
            parse_id("event_id", &self.event_id)?,
            parse_id("guest_id", &self.guest_id)?,
        ))
    }
}

/// `Path` param for `{user_id}` handlers.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UserPathParams {
    /// ID of the user.
    pub user_id: String,
}

impl UserPathParams {
    pub fn user_id(&self) -> Result<i64> {
        parse_id("user_id", &self.user_id)
    }
}
