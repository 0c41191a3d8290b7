//! Query contract types, constraints and other custom types.

mod constraints;
mod filtering;
mod pagination;
mod sorting;

pub use constraints::{ConstraintCategory, ConstraintViolation};
pub use filtering::{
    ColumnKind, EventFilter, EventFilterColumn, Filter, FilterColumn, FilterError, FilterOp,
    FilterTerm, FilterValue, GuestFilter, GuestFilterColumn, MAX_TERMS, ProjectFilter,
    ProjectFilterColumn, UserFilter, UserFilterColumn,
};
pub use pagination::{DEFAULT_LIMIT, MAX_LIMIT, Page, Pagination};
pub use sorting::{
    EventSortBy, EventSortField, GuestSortBy, GuestSortField, ProjectSortBy, ProjectSortField,
    SortBy, SortError, SortOrder, UserSortBy, UserSortField,
};
