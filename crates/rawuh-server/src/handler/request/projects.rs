//! Project request types.

use rawuh_postgres::model::{NewProject, UpdateProject as UpdateProjectModel};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validations::{name_format, remark_format};
use crate::handler::Result;
use crate::service::ServiceLimits;

/// Request payload for creating a new project.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
pub struct CreateProject {
    /// Name of the project.
    #[validate(custom(function = "name_format"))]
    pub project_name: String,
    /// Numeric lifecycle status, database default when absent.
    #[validate(range(min = 0))]
    pub status: Option<i64>,
    /// Description of the status.
    #[validate(custom(function = "remark_format"))]
    pub status_desc: Option<String>,
}

impl CreateProject {
    /// Checks the configurable length limits.
    pub fn check_limits(&self, limits: &ServiceLimits) -> Result<()> {
        limits.check_name("project_name", &self.project_name)?;
        if let Some(status_desc) = &self.status_desc {
            limits.check_remark("status_desc", status_desc)?;
        }
        Ok(())
    }

    /// Converts this request into a [`NewProject`] model.
    #[inline]
    pub fn into_model(self, created_by_id: i64) -> NewProject {
        NewProject {
            project_name: self.project_name.trim().to_owned(),
            status: self.status,
            status_desc: self.status_desc,
            created_by_id,
        }
    }
}

/// Request payload to update an existing project.
///
/// All fields are optional; only provided fields will be updated.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
pub struct UpdateProject {
    #[validate(custom(function = "name_format"))]
    pub project_name: Option<String>,
    #[validate(range(min = 0))]
    pub status: Option<i64>,
    #[validate(custom(function = "remark_format"))]
    pub status_desc: Option<String>,
}

impl UpdateProject {
    /// Checks the configurable length limits.
    pub fn check_limits(&self, limits: &ServiceLimits) -> Result<()> {
        if let Some(project_name) = &self.project_name {
            limits.check_name("project_name", project_name)?;
        }
        if let Some(status_desc) = &self.status_desc {
            limits.check_remark("status_desc", status_desc)?;
        }
        Ok(())
    }

    pub fn into_model(self, updated_by_id: i64) -> UpdateProjectModel {
        UpdateProjectModel {
            project_name: self.project_name.map(|name| name.trim().to_owned()),
            status: self.status,
            status_desc: self.status_desc,
            updated_by_id: Some(updated_by_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_invalid() {
        let request = CreateProject {
            project_name: "  ".into(),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn name_longer_than_limit_is_rejected() {
        let limits = ServiceLimits {
            name_max_length: 8,
            ..ServiceLimits::default()
        };
        let request = CreateProject {
            project_name: "Annual Summit".into(),
            ..Default::default()
        };

        assert!(request.validate().is_ok());
        assert!(request.check_limits(&limits).is_err());
    }

    #[test]
    fn update_sets_editor() {
        let request = UpdateProject {
            project_name: Some(" Expo ".into()),
            ..Default::default()
        };
        let model = request.into_model(42);

        assert_eq!(model.project_name.as_deref(), Some("Expo"));
        assert_eq!(model.updated_by_id, Some(42));
        assert_eq!(model.status, None);
    }
}
