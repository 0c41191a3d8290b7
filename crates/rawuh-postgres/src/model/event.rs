//! Event model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::events;

/// Event model. Every event belongs to exactly one project.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Event {
    /// Unique event identifier.
    pub event_id: i64,
    /// Owning project.
    pub project_id: i64,
    /// Event name.
    pub event_name: String,
    /// Event description.
    pub description: String,
    /// Scheduled start, if known.
    pub start_date: Option<Timestamp>,
    /// Scheduled end, never before `start_date`.
    pub end_date: Option<Timestamp>,
    /// Event-level options.
    pub event_options: serde_json::Value,
    /// Options applied to the guests of this event.
    pub guest_options: serde_json::Value,
    /// Timestamp when the event was created.
    pub created_at: Timestamp,
    /// User that created the event.
    pub created_by_id: i64,
    /// Display name of the creator at creation time.
    pub created_by_name: String,
    /// Timestamp when the event was last updated.
    pub updated_at: Timestamp,
    /// User that last updated the event.
    pub updated_by_id: Option<i64>,
    /// Display name of the last editor.
    pub updated_by_name: Option<String>,
}

/// Data for creating a new event.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewEvent {
    /// Owning project.
    pub project_id: i64,
    /// Event name.
    pub event_name: String,
    /// Description.
    pub description: Option<String>,
    /// Start.
    pub start_date: Option<Timestamp>,
    /// End.
    pub end_date: Option<Timestamp>,
    /// Event options.
    pub event_options: Option<serde_json::Value>,
    /// Guest options.
    pub guest_options: Option<serde_json::Value>,
    /// Creator.
    pub created_by_id: i64,
    /// Creator display name.
    pub created_by_name: String,
}

/// Data for updating an event.
#[derive(Debug, Default, Clone, AsChangeset)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateEvent {
    /// Event name.
    pub event_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Start.
    pub start_date: Option<Timestamp>,
    /// End.
    pub end_date: Option<Timestamp>,
    /// Event options.
    pub event_options: Option<serde_json::Value>,
    /// Guest options.
    pub guest_options: Option<serde_json::Value>,
    /// Editor.
    pub updated_by_id: Option<i64>,
    /// Editor display name.
    pub updated_by_name: Option<String>,
}
