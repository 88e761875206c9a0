//! Cart lifecycle rules.
//!
//! These are the predicates every cart operation evaluates inside its
//! transaction. They are pure so the storage layer only has to supply the
//! locked row and the current time.

use jiff::{SignedDuration, Timestamp};

use crate::domain::carts::{
    errors::CartsServiceError,
    models::{CartHead, ProductUuid, UserUuid},
};

/// Sliding expiry window applied at creation and on every renewing access.
pub const CART_TTL: SignedDuration = SignedDuration::from_hours(7 * 24);

/// The expiry a cart gets when it is touched at `now`.
///
/// # Errors
///
/// Returns [`CartsServiceError::Timestamp`] if the window overflows the timestamp range.
pub fn renewed_expiry(now: Timestamp) -> Result<Timestamp, CartsServiceError> {
    Ok(now.checked_add(CART_TTL)?)
}

/// Whether the row is visible to non-admin operations at `now`.
#[must_use]
pub fn is_active(head: &CartHead, now: Timestamp) -> bool {
    head.deleted_at.is_none() && head.expires_at > now
}

/// Check the optimistic-lock predicate for a mutation.
///
/// Inactive carts fail with [`CartsServiceError::NotFoundOrExpired`] regardless
/// of the supplied version, so a stale caller learns nothing about deleted carts.
///
/// # Errors
///
/// Returns `NotFoundOrExpired` for inactive carts and `VersionConflict` when
/// `expected_version` is given and differs from the stored version.
pub fn ensure_mutable(
    head: &CartHead,
    expected_version: Option<u64>,
    now: Timestamp,
) -> Result<(), CartsServiceError> {
    if !is_active(head, now) {
        return Err(CartsServiceError::NotFoundOrExpired);
    }

    match expected_version {
        Some(expected) if expected != head.version => {
            Err(CartsServiceError::VersionConflict { expected })
        }
        _ => Ok(()),
    }
}

/// # Errors
///
/// Returns [`CartsServiceError::InvalidArgument`] for a zero quantity.
pub fn validate_quantity(quantity: u32) -> Result<u32, CartsServiceError> {
    if quantity == 0 {
        return Err(CartsServiceError::InvalidArgument(
            "quantity must be positive",
        ));
    }

    Ok(quantity)
}

/// # Errors
///
/// Returns [`CartsServiceError::InvalidArgument`] for the nil UUID.
pub fn validate_user(user: UserUuid) -> Result<UserUuid, CartsServiceError> {
    if user.is_nil() {
        return Err(CartsServiceError::InvalidArgument("user uuid must not be nil"));
    }

    Ok(user)
}

/// # Errors
///
/// Returns [`CartsServiceError::InvalidArgument`] for the nil UUID.
pub fn validate_product(product: ProductUuid) -> Result<ProductUuid, CartsServiceError> {
    if product.is_nil() {
        return Err(CartsServiceError::InvalidArgument(
            "product uuid must not be nil",
        ));
    }

    Ok(product)
}
