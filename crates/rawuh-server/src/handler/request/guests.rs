//! Guest request types.

use rawuh_postgres::model::{NewGuest, UpdateGuest as UpdateGuestModel};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::validations::{name_format, remark_format};
use crate::handler::Result;
use crate::service::ServiceLimits;

fn validate_phone_format(phone: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_ascii_digit() || " +-()".contains(c);
    if !phone.chars().all(allowed) {
        return Err(ValidationError::new("phone_format"));
    }
    Ok(())
}

/// Request payload for adding a guest to an event.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
pub struct CreateGuest {
    /// Name of the guest.
    #[validate(custom(function = "name_format"))]
    pub name: String,
    /// Postal address.
    #[validate(custom(function = "remark_format"))]
    pub address: Option<String>,
    /// Phone number.
    #[validate(length(max = 32))]
    #[validate(custom(function = "validate_phone_format"))]
    pub phone: Option<String>,
    /// Contact email.
    #[validate(email)]
    pub email: Option<String>,
}

impl CreateGuest {
    /// Checks the configurable length limits.
    pub fn check_limits(&self, limits: &ServiceLimits) -> Result<()> {
        limits.check_name("name", &self.name)?;
        if let Some(address) = &self.address {
            limits.check_remark("address", address)?;
        }
        Ok(())
    }

    pub fn into_model(self, project_id: i64, event_id: i64) -> NewGuest {
        NewGuest {
            project_id,
            event_id,
            name: self.name.trim().to_owned(),
            address: self.address,
            phone: self.phone,
            email: self.email,
        }
    }
}

/// Request payload to update a guest.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
pub struct UpdateGuest {
    #[validate(custom(function = "name_format"))]
    pub name: Option<String>,
    #[validate(custom(function = "remark_format"))]
    pub address: Option<String>,
    #[validate(length(max = 32))]
    #[validate(custom(function = "validate_phone_format"))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

impl UpdateGuest {
    /// Checks the configurable length limits.
    pub fn check_limits(&self, limits: &ServiceLimits) -> Result<()> {
        if let Some(name) = &self.name {
            limits.check_name("name", name)?;
        }
        if let Some(address) = &self.address {
            limits.check_remark("address", address)?;
        }
        Ok(())
    }

    pub fn into_model(self) -> UpdateGuestModel {
        UpdateGuestModel {
            name: self.name.map(|name| name.trim().to_owned()),
            address: self.address,
            phone: self.phone,
            email: self.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_email_is_rejected() {
        let request = CreateGuest {
            name: "Budi".into(),
            email: Some("not-an-email".into()),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn phone_format() {
        let valid = CreateGuest {
            name: "Budi".into(),
            phone: Some("+62 (21) 555-0101".into()),
            ..Default::default()
        };
        assert!(valid.validate().is_ok());

        let invalid = UpdateGuest {
            phone: Some("call me".into()),
            ..Default::default()
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn model_is_scoped_to_event() {
        let model = CreateGuest {
            name: "Budi".into(),
            ..Default::default()
        }
        .into_model(7, 3);

        assert_eq!((model.project_id, model.event_id), (7, 3));
    }
}
