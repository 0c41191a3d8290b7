//! Repository traits implemented on [`PgConnection`](crate::PgConnection).
//!
//! Every list operation applies the same contract in the same order: the
//! tenant predicate, then the client filter terms, then sorting, then
//! pagination. Rows are counted over the same predicates so the caller can
//! report `total_rows`.

mod auth;
mod event;
mod guest;
mod project;
mod user;

pub use auth::AuthRepository;
use diesel::expression::BoxableExpression;
use diesel::pg::Pg;
use diesel::sql_types::Bool;
pub use event::EventRepository;
pub use guest::GuestRepository;
pub use project::ProjectRepository;
pub use user::UserRepository;

use crate::PgError;
use crate::types::FilterTerm;

/// Boxed boolean predicate over the table `T`.
pub(crate) type Predicate<T> = Box<dyn BoxableExpression<T, Pg, SqlType = Bool>>;

/// Error for a filter term whose value does not fit its column.
///
/// Terms are type checked while parsing, so this only fires if a column
/// enum and the schema drift apart.
pub(crate) fn mismatched_term<C: std::fmt::Display>(term: &FilterTerm<C>) -> PgError {
    PgError::Unexpected(
        format!(
            "filter term on {} does not match the column type",
            term.column
        )
        .into(),
    )
}

/// Builds a predicate for a text column. Every operator applies.
macro_rules! text_predicate {
    ($table:ty, $column:expr, $op:expr, $value:expr) => {{
        use $crate::types::FilterOp;

        let value: String = $value;
        let predicate: $crate::query::Predicate<$table> = match $op {
            FilterOp::Eq => Box::new($column.eq(value)),
            FilterOp::NotEq => Box::new($column.ne(value)),
            FilterOp::Lt => Box::new($column.lt(value)),
            FilterOp::LtEq => Box::new($column.le(value)),
            FilterOp::Gt => Box::new($column.gt(value)),
            FilterOp::GtEq => Box::new($column.ge(value)),
            FilterOp::Like => Box::new($column.like(value)),
            FilterOp::ILike => Box::new($column.ilike(value)),
        };
        Some(predicate)
    }};
}

/// Builds a predicate for an integer or timestamp column.
///
/// Pattern operators yield `None`.
macro_rules! ordered_predicate {
    ($table:ty, $column:expr, $op:expr, $value:expr) => {{
        use $crate::types::FilterOp;

        let value = $value;
        let predicate: Option<$crate::query::Predicate<$table>> = match $op {
            FilterOp::Eq => Some(Box::new($column.eq(value))),
            FilterOp::NotEq => Some(Box::new($column.ne(value))),
            FilterOp::Lt => Some(Box::new($column.lt(value))),
            FilterOp::LtEq => Some(Box::new($column.le(value))),
            FilterOp::Gt => Some(Box::new($column.gt(value))),
            FilterOp::GtEq => Some(Box::new($column.ge(value))),
            FilterOp::Like | FilterOp::ILike => None,
        };
        predicate
    }};
}

pub(crate) use {ordered_predicate, text_predicate};

/// Renders a query as `(sql, binds)` without a connection.
#[cfg(test)]
pub(crate) fn render<T>(query: &T) -> (String, String)
where
    T: diesel::query_builder::QueryFragment<Pg>,
{
    let rendered = diesel::debug_query::<Pg, _>(query).to_string();
    let (sql, binds) = rendered
        .split_once("-- binds: ")
        .unwrap_or((rendered.as_str(), ""));
    (sql.trim().to_owned(), binds.to_owned())
}
