//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The cart is absent, soft-deleted or expired. Callers cannot tell which.
    #[error("cart not found or expired")]
    NotFoundOrExpired,

    #[error("cart item not found")]
    ItemNotFound,

    /// Admin target does not exist.
    #[error("cart not found")]
    NotFound,

    #[error("cart version {expected} is stale")]
    VersionConflict { expected: u64 },

    #[error("storage constraint violated")]
    ConstraintViolation(#[source] Error),

    #[error("timestamp out of range")]
    Timestamp(#[from] jiff::Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation,
            ) => Self::ConstraintViolation(error),
            _ => Self::Sql(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_storage_errors() {
        let error = CartsServiceError::from(Error::PoolTimedOut);

        assert!(
            matches!(error, CartsServiceError::Sql(Error::PoolTimedOut)),
            "expected Sql, got {error:?}"
        );
    }

    #[test]
    fn row_not_found_is_not_mistaken_for_a_missing_cart() {
        let error = CartsServiceError::from(Error::RowNotFound);

        assert!(
            matches!(error, CartsServiceError::Sql(Error::RowNotFound)),
            "expected Sql, got {error:?}"
        );
    }

    #[test]
    fn version_conflict_names_the_stale_version() {
        let error = CartsServiceError::VersionConflict { expected: 3 };

        assert_eq!(error.to_string(), "cart version 3 is stale");
    }
}
