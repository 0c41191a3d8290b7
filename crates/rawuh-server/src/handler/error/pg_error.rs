//! Storage error to HTTP error conversion.
//!
//! Constraint violations map by category: uniqueness to `409`, check
//! constraints to `400` and foreign keys to `404`, each with a fixed message.
//! Every other storage failure is logged and becomes a generic `500`, so no
//! database diagnostics reach the client.

use rawuh_postgres::types::{ConstraintCategory, ConstraintViolation};
use rawuh_postgres::{DieselError, PgError};

use crate::handler::{Error, ErrorKind};

/// Tracing target for storage error conversion.
const TRACING_TARGET: &str = "rawuh_server::postgres_constraints";

impl From<ConstraintViolation> for Error<'static> {
    fn from(constraint: ConstraintViolation) -> Self {
        match constraint {
            ConstraintViolation::AuthUsernameUnique => ErrorKind::Conflict
                .with_message("username already exists")
                .with_resource("user"),
            ConstraintViolation::EventEndAfterStart => ErrorKind::BadRequest
                .with_message("end date must not be before start date")
                .with_resource("event"),
            other => match other.categorize() {
                ConstraintCategory::Uniqueness => ErrorKind::Conflict
                    .with_context(other.to_string())
                    .into_static(),
                ConstraintCategory::Validation => ErrorKind::BadRequest
                    .with_message("invalid field value")
                    .with_context(other.to_string())
                    .into_static(),
                ConstraintCategory::Chronological => ErrorKind::BadRequest
                    .with_message("timestamps are out of order")
                    .with_context(other.to_string())
                    .into_static(),
                ConstraintCategory::Reference => ErrorKind::NotFound
                    .with_message("referenced resource not found")
                    .with_context(other.to_string())
                    .into_static(),
            },
        }
    }
}

impl From<PgError> for Error<'static> {
    fn from(error: PgError) -> Self {
        match error {
            PgError::Config(config_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %config_error,
                    "database configuration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Timeout(timeout) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    timeout = ?timeout,
                    "database pool timeout",
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Connection(connection_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %connection_error,
                    "database connection error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Migration(migration_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %migration_error,
                    "database migration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Query(ref query_error) => {
                if let Some(constraint_name) = error.constraint()
                    && let Some(constraint) = ConstraintViolation::new(constraint_name)
                {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        constraint = constraint_name,
                        error = %query_error,
                        "query error (constraint violation)"
                    );
                    return constraint.into();
                }

                tracing::error!(
                    target: TRACING_TARGET,
                    error = %query_error,
                    "query error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Unexpected(unexpected_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %unexpected_error,
                    "unexpected database error"
                );
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}

impl From<DieselError> for Error<'static> {
    #[inline]
    fn from(error: DieselError) -> Self {
        PgError::from(error).into()
    }
}
