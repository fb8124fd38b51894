//! Diesel error mapping shared by the repositories.
//!
//! Every adapter maps pool failures to its port's `Connection` variant and
//! generic Diesel failures to `Query`. Constraint violations are classified
//! first so adapters can surface port-specific variants for them.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Constraint violations the adapters translate into port variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintViolation {
    /// A unique index rejected the row.
    Unique,
    /// A foreign key referenced a missing row.
    ForeignKey,
}

/// Classify a Diesel error as a constraint violation, if it is one.
pub(crate) fn constraint_violation(error: &DieselError) -> Option<ConstraintViolation> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            Some(ConstraintViolation::Unique)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            Some(ConstraintViolation::ForeignKey)
        }
        _ => None,
    }
}

/// Map pool errors into a repository-specific connection error.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.into_message())
}

/// Map Diesel errors into query/connection constructors.
///
/// `NotFound`, query-builder and database failures become query errors; a
/// closed connection becomes a connection error. Details are logged at
/// debug level and kept out of the returned message.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(&'static str),
        Connection(String),
    }

    fn map(error: DieselError) -> Mapped {
        map_basic_diesel_error(error, Mapped::Query, |message| {
            Mapped::Connection(message.to_owned())
        })
    }

    #[rstest]
    fn not_found_maps_to_query() {
        assert_eq!(map(DieselError::NotFound), Mapped::Query("record not found"));
    }

    #[rstest]
    fn closed_connection_maps_to_connection() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("closed".to_owned()),
        );
        assert_eq!(
            map(error),
            Mapped::Connection("database connection error".into())
        );
    }

    #[rstest]
    #[case(DatabaseErrorKind::UniqueViolation, Some(ConstraintViolation::Unique))]
    #[case(DatabaseErrorKind::ForeignKeyViolation, Some(ConstraintViolation::ForeignKey))]
    #[case(DatabaseErrorKind::CheckViolation, None)]
    fn constraint_violations_are_classified(
        #[case] kind: DatabaseErrorKind,
        #[case] expected: Option<ConstraintViolation>,
    ) {
        let error = DieselError::DatabaseError(kind, Box::new("violation".to_owned()));
        assert_eq!(constraint_violation(&error), expected);
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let mapped: Mapped =
            map_basic_pool_error(PoolError::checkout("timed out"), Mapped::Connection);
        assert_eq!(mapped, Mapped::Connection("timed out".into()));
    }
}
