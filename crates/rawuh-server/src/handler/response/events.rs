//! Event response types.

use jiff::Timestamp;
use rawuh_postgres::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event response.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Event {
    pub event_id: i64,
    pub project_id: i64,
    pub event_name: String,
    pub description: String,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    /// Free-form options of the event.
    pub event_options: Value,
    /// Free-form options applied to the guests of the event.
    pub guest_options: Value,
    pub created_at: Timestamp,
    pub created_by_id: i64,
    pub created_by_name: String,
    pub updated_at: Timestamp,
    pub updated_by_id: Option<i64>,
    pub updated_by_name: Option<String>,
}

impl Event {
    /// Creates a new instance of [`Event`] from the database model.
    pub fn from_model(event: model::Event) -> Self {
        Self {
            event_id: event.event_id,
            project_id: event.project_id,
            event_name: event.event_name,
            description: event.description,
            start_date: event.start_date.map(Into::into),
            end_date: event.end_date.map(Into::into),
            event_options: event.event_options,
            guest_options: event.guest_options,
            created_at: event.created_at.into(),
            created_by_id: event.created_by_id,
            created_by_name: event.created_by_name,
            updated_at: event.updated_at.into(),
            updated_by_id: event.updated_by_id,
            updated_by_name: event.updated_by_name,
        }
    }
}

impl From<model::Event> for Event {
    #[inline]
    fn from(event: model::Event) -> Self {
        Self::from_model(event)
    }
}
