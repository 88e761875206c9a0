//! Admin Cart Handlers

use salvo::oapi::extract::QueryParam;
use uuid::Uuid;

use trolley_app::carts::data::{CartsFilter, Pagination};

pub(crate) mod delete;
pub(crate) mod export;
pub(crate) mod index;
pub(crate) mod restore;

/// Listing selection shared by the index and export endpoints.
fn selection(
    user_uuid: QueryParam<Uuid, false>,
    include_deleted: QueryParam<bool, false>,
    limit: QueryParam<u32, false>,
    offset: QueryParam<u64, false>,
) -> (CartsFilter, Pagination) {
    let filter = CartsFilter {
        user_uuid: user_uuid.into_inner().map(Into::into),
        include_deleted: include_deleted.into_inner().unwrap_or(false),
    };

    let pagination = Pagination {
        limit: limit.into_inner(),
        offset: offset.into_inner().unwrap_or(0),
    };

    (filter, pagination)
}
