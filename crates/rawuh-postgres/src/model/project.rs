//! Project model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::projects;

/// Project model, the top-level tenant.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Project {
    /// Unique project identifier.
    pub project_id: i64,
    /// Human-readable project name.
    pub project_name: String,
    /// Numeric lifecycle status (`1` is active).
    pub status: i64,
    /// Free-form description of the status.
    pub status_desc: String,
    /// Timestamp when the project was created.
    pub created_at: Timestamp,
    /// User that created the project.
    pub created_by_id: i64,
    /// Timestamp when the project was last updated.
    pub updated_at: Timestamp,
    /// User that last updated the project.
    pub updated_by_id: Option<i64>,
}

/// Data for creating a new project.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewProject {
    /// Project name.
    pub project_name: String,
    /// Status, database default when absent.
    pub status: Option<i64>,
    /// Status description.
    pub status_desc: Option<String>,
    /// Creator.
    pub created_by_id: i64,
}

/// Data for updating a project.
#[derive(Debug, Default, Clone, AsChangeset)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateProject {
    /// Project name.
    pub project_name: Option<String>,
    /// Status.
    pub status: Option<i64>,
    /// Status description.
    pub status_desc: Option<String>,
    /// Editor.
    pub updated_by_id: Option<i64>,
}
