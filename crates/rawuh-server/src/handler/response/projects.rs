//! Project response types.

use jiff::Timestamp;
use rawuh_postgres::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Project response.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Project {
    /// ID of the project.
    pub project_id: i64,
    /// Name of the project.
    pub project_name: String,
    /// Numeric lifecycle status.
    pub status: i64,
    /// Description of the status.
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

impl Project {
    /// Creates a new instance of [`Project`] from the database model.
    pub fn from_model(project: model::Project) -> Self {
        Self {
            project_id: project.project_id,
            project_name: project.project_name,
            status: project.status,
            status_desc: project.status_desc,
            created_at: project.created_at.into(),
            created_by_id: project.created_by_id,
            updated_at: project.updated_at.into(),
            updated_by_id: project.updated_by_id,
        }
    }
}

impl From<model::Project> for Project {
    #[inline]
    fn from(project: model::Project) -> Self {
        Self::from_model(project)
    }
}
