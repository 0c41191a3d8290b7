//! Event request types.

use jiff::Timestamp;
use rawuh_postgres::model::{NewEvent, UpdateEvent as UpdateEventModel};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use super::validations::{name_format, remark_format, validation_error};
use crate::extract::AuthClaims;
use crate::handler::Result;
use crate::service::ServiceLimits;

/// Rejects an end before the start when both are given.
fn check_schedule(start: Option<Timestamp>, end: Option<Timestamp>) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(validation_error(
            "schedule",
            "end_date must not be before start_date",
        )),
        _ => Ok(()),
    }
}

/// Request payload for creating a new event.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[validate(schema(function = "validate_create_schedule"))]
pub struct CreateEvent {
    /// Name of the event.
    #[validate(custom(function = "name_format"))]
    pub event_name: String,
    /// Description of the event.
    #[validate(custom(function = "remark_format"))]
    pub description: Option<String>,
    /// Scheduled start (RFC 3339).
    pub start_date: Option<Timestamp>,
    /// Scheduled end (RFC 3339), not before the start.
    pub end_date: Option<Timestamp>,
    /// Free-form event options.
    pub event_options: Option<Value>,
    /// Free-form options applied to guests.
    pub guest_options: Option<Value>,
}

fn validate_create_schedule(request: &CreateEvent) -> Result<(), ValidationError> {
    check_schedule(request.start_date, request.end_date)
}

impl CreateEvent {
    /// Checks the configurable length limits.
    pub fn check_limits(&self, limits: &ServiceLimits) -> Result<()> {
        limits.check_name("event_name", &self.event_name)?;
        if let Some(description) = &self.description {
            limits.check_remark("description", description)?;
        }
        Ok(())
    }

    /// Converts this request into a [`NewEvent`] owned by `project_id`.
    pub fn into_model(self, project_id: i64, creator: &AuthClaims) -> NewEvent {
        NewEvent {
            project_id,
            event_name: self.event_name.trim().to_owned(),
            description: self.description,
            start_date: self.start_date.map(Into::into),
            end_date: self.end_date.map(Into::into),
            event_options: self.event_options,
            guest_options: self.guest_options,
            created_by_id: creator.user_id,
            created_by_name: creator.name.clone(),
        }
    }
}

/// Request payload to update an existing event.
///
/// All fields are optional; only provided fields will be updated.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[validate(schema(function = "validate_update_schedule"))]
pub struct UpdateEvent {
    #[validate(custom(function = "name_format"))]
    pub event_name: Option<String>,
    #[validate(custom(function = "remark_format"))]
    pub description: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub event_options: Option<Value>,
    pub guest_options: Option<Value>,
}

fn validate_update_schedule(request: &UpdateEvent) -> Result<(), ValidationError> {
    check_schedule(request.start_date, request.end_date)
}

impl UpdateEvent {
    /// Checks the configurable length limits.
    pub fn check_limits(&self, limits: &ServiceLimits) -> Result<()> {
        if let Some(event_name) = &self.event_name {
            limits.check_name("event_name", event_name)?;
        }
        if let Some(description) = &self.description {
            limits.check_remark("description", description)?;
        }
        Ok(())
    }

    pub fn into_model(self, editor: &AuthClaims) -> UpdateEventModel {
        UpdateEventModel {
            event_name: self.event_name.map(|name| name.trim().to_owned()),
            description: self.description,
            start_date: self.start_date.map(Into::into),
            end_date: self.end_date.map(Into::into),
            event_options: self.event_options,
            guest_options: self.guest_options,
            updated_by_id: Some(editor.user_id),
            updated_by_name: Some(editor.name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn end_before_start_is_invalid() {
        let request = CreateEvent {
            event_name: "Launch".into(),
            start_date: Some(ts("2025-06-02T10:00:00Z")),
            end_date: Some(ts("2025-06-01T10:00:00Z")),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn same_start_and_end_is_valid() {
        let request = CreateEvent {
            event_name: "Launch".into(),
            start_date: Some(ts("2025-06-01T10:00:00Z")),
            end_date: Some(ts("2025-06-01T10:00:00Z")),
            ..Default::default()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn open_ended_schedule_is_valid() {
        let request = UpdateEvent {
            end_date: Some(ts("2025-06-01T10:00:00Z")),
            ..Default::default()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn model_records_creator() {
        let claims = AuthClaims {
            user_id: 5,
            name: "Dewi".into(),
            ..Default::default()
        };
        let request = CreateEvent {
            event_name: " Gala ".into(),
            ..Default::default()
        };
        let model = request.into_model(7, &claims);

        assert_eq!(model.project_id, 7);
        assert_eq!(model.event_name, "Gala");
        assert_eq!(model.created_by_id, 5);
        assert_eq!(model.created_by_name, "Dewi");
    }
}
