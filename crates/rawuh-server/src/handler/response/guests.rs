//! Guest response types.

use jiff::Timestamp;
use rawuh_postgres::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Guest response.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Guest {
    pub guest_id: i64,
    pub project_id: i64,
    pub event_id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Guest {
    /// Creates a new instance of [`Guest`] from the database model.
    pub fn from_model(guest: model::Guest) -> Self {
        Self {
            guest_id: guest.guest_id,
            project_id: guest.project_id,
            event_id: guest.event_id,
            name: guest.name,
            address: guest.address,
            phone: guest.phone,
            email: guest.email,
            created_at: guest.created_at.into(),
            updated_at: guest.updated_at.into(),
        }
    }
}

impl From<model::Guest> for Guest {
    #[inline]
    fn from(guest: model::Guest) -> Self {
        Self::from_model(guest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_model_copies_every_field() {
        let created_at = Timestamp::from_second(1_700_000_000).unwrap();
        let updated_at = Timestamp::from_second(1_700_000_600).unwrap();
        let guest = Guest::from_model(model::Guest {
            guest_id: 11,
            project_id: 2,
            event_id: 5,
            name: "Ann".into(),
            address: "Jl. Merdeka 1".into(),
            phone: "+62 811".into(),
            email: "ann@example.com".into(),
            created_at: created_at.into(),
            updated_at: updated_at.into(),
        });

        assert_eq!((guest.guest_id, guest.project_id, guest.event_id), (11, 2, 5));
        assert_eq!(guest.name, "Ann");
        assert_eq!(guest.email, "ann@example.com");
        assert_eq!(guest.created_at, created_at);
        assert_eq!(guest.updated_at, updated_at);
    }
}
