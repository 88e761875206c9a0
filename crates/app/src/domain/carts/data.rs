//! Cart Data

use crate::domain::carts::{
    errors::CartsServiceError,
    models::{ProductUuid, UserUuid},
};

/// Default page size for admin listings.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Largest page an admin listing may request.
pub const MAX_PAGE_LIMIT: u32 = 500;

/// Largest offset the store can address.
pub const MAX_OFFSET: u64 = i64::MAX.unsigned_abs();

/// New Cart Item Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    /// When given, the add only succeeds against this cart version.
    pub expected_version: Option<u64>,
}

/// Cart Item Update Data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartItemUpdate {
    pub quantity: u32,
    pub expected_version: u64,
}

/// Admin listing filter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CartsFilter {
    pub user_uuid: Option<UserUuid>,
    pub include_deleted: bool,
}

/// Offset pagination.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pagination {
    pub limit: Option<u32>,
    pub offset: u64,
}

impl Pagination {
    /// Resolve the page size for a bounded listing.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::InvalidArgument`] when the limit is zero or
    /// exceeds [`MAX_PAGE_LIMIT`].
    pub fn page_limit(&self) -> Result<u32, CartsServiceError> {
        match self.limit {
            None => Ok(DEFAULT_PAGE_LIMIT),
            Some(0) => Err(CartsServiceError::InvalidArgument(
                "limit must be greater than zero",
            )),
            Some(limit) if limit > MAX_PAGE_LIMIT => Err(CartsServiceError::InvalidArgument(
                "limit exceeds the maximum page size",
            )),
            Some(limit) => Ok(limit),
        }
    }

    /// Check the offset fits the store's signed row offset.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::InvalidArgument`] when the offset exceeds
    /// [`MAX_OFFSET`].
    pub fn checked_offset(&self) -> Result<u64, CartsServiceError> {
        if self.offset > MAX_OFFSET {
            return Err(CartsServiceError::InvalidArgument("offset out of range"));
        }

        Ok(self.offset)
    }
}
