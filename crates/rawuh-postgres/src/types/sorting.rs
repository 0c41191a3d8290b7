//! Sorting options for list queries.
//!
//! Every resource exposes its own closed set of sortable columns. Client
//! input is parsed into these enums, so a column name never reaches SQL
//! as text.

use std::str::FromStr;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Sort order direction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortOrder {
    /// Ascending order (A-Z, oldest first, smallest first).
    #[default]
    Asc,
    /// Descending order (Z-A, newest first, largest first).
    Desc,
}

/// Rejected `sort`/`dir` pair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortError {
    /// The column is not in the resource's allow-list.
    #[error("unsupported sort column: {0:?}")]
    Column(String),
    /// The direction is neither `asc` nor `desc`.
    #[error("unsupported sort direction: {0:?}")]
    Direction(String),
}

/// Generic sort specification with field and order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SortBy<F> {
    /// The field to sort by.
    pub field: F,
    /// The sort order direction.
    #[serde(default)]
    pub order: SortOrder,
}

impl<F> SortBy<F> {
    /// Creates a new sort specification with the given field and order.
    #[inline]
    pub fn new(field: F, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Creates a new sort specification with ascending order.
    #[inline]
    pub fn asc(field: F) -> Self {
        Self::new(field, SortOrder::Asc)
    }

    /// Creates a new sort specification with descending order.
    #[inline]
    pub fn desc(field: F) -> Self {
        Self::new(field, SortOrder::Desc)
    }
}

impl<F: FromStr> SortBy<F> {
    /// Parses a client-supplied column and direction.
    ///
    /// Both values are lower-cased first but not trimmed. Two empty strings
    /// mean "no sort" and yield `Ok(None)`. As soon as either one is
    /// non-empty, both must be valid, so whitespace is rejected.
    pub fn parse(column: &str, direction: &str) -> Result<Option<Self>, SortError> {
        let column = column.to_ascii_lowercase();
        let direction = direction.to_ascii_lowercase();

        if column.is_empty() && direction.is_empty() {
            return Ok(None);
        }

        let field = column.parse::<F>().map_err(|_| SortError::Column(column))?;
        let order = direction
            .parse::<SortOrder>()
            .map_err(|_| SortError::Direction(direction))?;

        Ok(Some(Self::new(field, order)))
    }
}

/// Sortable project columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProjectSortField {
    CreatedAt,
    UpdatedAt,
    Status,
    ProjectName,
}

/// Sortable event columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventSortField {
    EventName,
    EventId,
    CreatedAt,
    UpdatedAt,
    StartDate,
    EndDate,
}

/// Sortable guest columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GuestSortField {
    CreatedAt,
    Name,
    Address,
    Phone,
    Email,
}

/// Sortable user columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UserSortField {
    CreatedAt,
    Name,
    Username,
    UserType,
    Email,
}

/// Sorting specification for projects.
pub type ProjectSortBy = SortBy<ProjectSortField>;
/// Sorting specification for events.
pub type EventSortBy = SortBy<EventSortField>;
/// Sorting specification for guests.
pub type GuestSortBy = SortBy<GuestSortField>;
/// Sorting specification for users.
pub type UserSortBy = SortBy<UserSortField>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pair_means_no_sort() {
        assert_eq!(EventSortBy::parse("", ""), Ok(None));
    }

    #[test]
    fn whitespace_is_not_empty() {
        assert_eq!(
            EventSortBy::parse(" ", ""),
            Err(SortError::Column(" ".into()))
        );
        assert_eq!(
            GuestSortBy::parse("", "\t"),
            Err(SortError::Column(String::new()))
        );
        assert_eq!(
            GuestSortBy::parse(" name", "asc"),
            Err(SortError::Column(" name".into()))
        );
        assert_eq!(
            GuestSortBy::parse("name", "asc "),
            Err(SortError::Direction("asc ".into()))
        );
    }

    #[test]
    fn allowed_pair_is_case_insensitive() {
        let sort = EventSortBy::parse("Start_Date", "DESC").unwrap();
        assert_eq!(sort, Some(SortBy::desc(EventSortField::StartDate)));

        let sort = UserSortBy::parse("user_type", "asc").unwrap();
        assert_eq!(sort, Some(SortBy::asc(UserSortField::UserType)));
    }

    #[test]
    fn unknown_column_is_rejected() {
        assert_eq!(
            EventSortBy::parse("drop_table", "asc"),
            Err(SortError::Column("drop_table".into()))
        );
        // Columns are per resource.
        assert!(GuestSortBy::parse("event_name", "asc").is_err());
        assert!(ProjectSortBy::parse("email", "desc").is_err());
    }

    #[test]
    fn both_halves_are_validated() {
        assert_eq!(
            GuestSortBy::parse("name", ""),
            Err(SortError::Direction(String::new()))
        );
        assert_eq!(
            GuestSortBy::parse("", "asc"),
            Err(SortError::Column(String::new()))
        );
        assert_eq!(
            GuestSortBy::parse("name", "sideways"),
            Err(SortError::Direction("sideways".into()))
        );
    }

    #[test]
    fn every_allowed_column_parses() {
        for column in ["created_at", "updated_at", "status", "project_name"] {
            assert!(ProjectSortBy::parse(column, "asc").is_ok(), "{column}");
        }
        for column in [
            "event_name",
            "event_id",
            "created_at",
            "updated_at",
            "start_date",
            "end_date",
        ] {
            assert!(EventSortBy::parse(column, "asc").is_ok(), "{column}");
        }
        for column in ["created_at", "name", "address", "phone", "email"] {
            assert!(GuestSortBy::parse(column, "asc").is_ok(), "{column}");
        }
        for column in ["created_at", "name", "username", "user_type", "email"] {
            assert!(UserSortBy::parse(column, "asc").is_ok(), "{column}");
        }
    }
}
