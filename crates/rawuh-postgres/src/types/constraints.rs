//! Named database constraints and how their violations are classified.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Categories of database constraint violations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Data validation constraints (format, length, range checks).
    Validation,
    /// Chronological integrity constraints (timestamp relationships).
    Chronological,
    /// Uniqueness constraints (primary keys, unique indexes).
    Uniqueness,
    /// Foreign key constraints.
    Reference,
}

/// Every named constraint of the schema.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum ConstraintViolation {
    #[strum(serialize = "projects_project_name_not_blank")]
    ProjectNameNotBlank,
    #[strum(serialize = "projects_updated_after_created")]
    ProjectUpdatedAfterCreated,

    #[strum(serialize = "events_project_id_fkey")]
    EventProjectReference,
    #[strum(serialize = "events_end_after_start")]
    EventEndAfterStart,
    #[strum(serialize = "events_updated_after_created")]
    EventUpdatedAfterCreated,

    #[strum(serialize = "guests_project_id_fkey")]
    GuestProjectReference,
    #[strum(serialize = "guests_event_id_fkey")]
    GuestEventReference,
    #[strum(serialize = "guests_updated_after_created")]
    GuestUpdatedAfterCreated,

    #[strum(serialize = "users_user_type_valid")]
    UserTypeValid,
    #[strum(serialize = "users_updated_after_created")]
    UserUpdatedAfterCreated,

    #[strum(serialize = "auth_username_unique")]
    AuthUsernameUnique,
    #[strum(serialize = "auth_user_id_fkey")]
    AuthUserReference,
}

impl ConstraintViolation {
    /// Creates a new [`ConstraintViolation`] from the constraint name.
    ///
    /// Returns `None` for constraints the schema does not name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            Self::ProjectNameNotBlank | Self::UserTypeValid => ConstraintCategory::Validation,
            Self::ProjectUpdatedAfterCreated
            | Self::EventEndAfterStart
            | Self::EventUpdatedAfterCreated
            | Self::GuestUpdatedAfterCreated
            | Self::UserUpdatedAfterCreated => ConstraintCategory::Chronological,
            Self::AuthUsernameUnique => ConstraintCategory::Uniqueness,
            Self::EventProjectReference
            | Self::GuestProjectReference
            | Self::GuestEventReference
            | Self::AuthUserReference => ConstraintCategory::Reference,
        }
    }
}

impl From<ConstraintViolation> for String {
    #[inline]
    fn from(val: ConstraintViolation) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ConstraintViolation {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
