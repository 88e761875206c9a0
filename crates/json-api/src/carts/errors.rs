//! Errors

use salvo::http::StatusError;
use tracing::error;

use trolley_app::carts::CartsServiceError;

use crate::observability;

/// Metric label for a failed operation.
pub(crate) fn outcome_label(error: &CartsServiceError) -> &'static str {
    match error {
        CartsServiceError::InvalidArgument(_) => "invalid_argument",
        CartsServiceError::NotFoundOrExpired => "not_found_or_expired",
        CartsServiceError::NotFound | CartsServiceError::ItemNotFound => "not_found",
        CartsServiceError::VersionConflict { .. } => "version_conflict",
        CartsServiceError::ConstraintViolation(_) => "constraint_violation",
        CartsServiceError::Timestamp(_) | CartsServiceError::Sql(_) => "internal",
    }
}

/// Count the outcome of a service call under `operation`, then map failures to HTTP.
pub(crate) trait CartsResultExt<T> {
    fn observed(self, operation: &'static str) -> Result<T, StatusError>;
}

impl<T> CartsResultExt<T> for Result<T, CartsServiceError> {
    fn observed(self, operation: &'static str) -> Result<T, StatusError> {
        let outcome = self.as_ref().map_or_else(outcome_label, |_| "ok");

        observability::observe_cart_operation(operation, outcome);

        self.map_err(into_status_error)
    }
}

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::InvalidArgument(reason) => StatusError::bad_request().brief(reason),
        CartsServiceError::NotFoundOrExpired => {
            StatusError::not_found().brief("Cart not found or expired")
        }
        CartsServiceError::NotFound => StatusError::not_found().brief("Cart not found"),
        CartsServiceError::ItemNotFound => StatusError::not_found().brief("Cart item not found"),
        CartsServiceError::VersionConflict { expected } => StatusError::conflict()
            .brief(format!("Cart version {expected} is stale; reload the cart and retry")),
        CartsServiceError::ConstraintViolation(source) => {
            tracing::warn!("cart constraint violated: {source}");

            StatusError::conflict().brief("Cart change violates a storage constraint")
        }
        CartsServiceError::Timestamp(source) => {
            error!("cart timestamp out of range: {source}");

            StatusError::internal_server_error()
        }
        CartsServiceError::Sql(source) => {
            error!("cart storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn lifecycle_errors_map_to_client_statuses() {
        let cases = [
            (
                CartsServiceError::InvalidArgument("quantity must be positive"),
                StatusCode::BAD_REQUEST,
            ),
            (CartsServiceError::NotFoundOrExpired, StatusCode::NOT_FOUND),
            (CartsServiceError::NotFound, StatusCode::NOT_FOUND),
            (CartsServiceError::ItemNotFound, StatusCode::NOT_FOUND),
            (CartsServiceError::VersionConflict { expected: 4 }, StatusCode::CONFLICT),
        ];

        for (error, status) in cases {
            let description = error.to_string();

            assert_eq!(into_status_error(error).code, status, "{description}");
        }
    }

    #[test]
    fn observed_results_are_counted_and_mapped() {
        let before = observability::cart_operation_count("errors_test_update", "version_conflict");

        let result: Result<(), CartsServiceError> =
            Err(CartsServiceError::VersionConflict { expected: 2 });

        let status = result.observed("errors_test_update").err().map(|error| error.code);

        assert_eq!(status, Some(StatusCode::CONFLICT), "mapped status");
        assert_eq!(
            observability::cart_operation_count("errors_test_update", "version_conflict"),
            before + 1,
            "conflict counted"
        );
    }

    #[test]
    fn outcome_labels_group_missing_targets() {
        assert_eq!(outcome_label(&CartsServiceError::ItemNotFound), "not_found", "item");
        assert_eq!(outcome_label(&CartsServiceError::NotFound), "not_found", "admin target");
        assert_eq!(
            outcome_label(&CartsServiceError::NotFoundOrExpired),
            "not_found_or_expired",
            "inactive cart"
        );
    }

    #[test]
    fn timestamp_overflow_is_internal() {
        let Err(source) = jiff::Timestamp::MAX.checked_add(jiff::SignedDuration::from_hours(1)) else {
            return;
        };

        let status = into_status_error(CartsServiceError::Timestamp(source)).code;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "timestamp overflow");
    }
}
