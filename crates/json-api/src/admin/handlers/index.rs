//! List Carts Handler

use salvo::{oapi::extract::QueryParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{errors::CartsResultExt as _, responses::CartsPageResponse},
    extensions::*,
};

use super::selection;

/// List Carts Handler
///
/// Lists carts in creation order. Expired carts are included; soft-deleted
/// carts only when `include_deleted` is set.
#[endpoint(
    tags("admin"),
    summary = "List Carts",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Page of carts"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    user_uuid: QueryParam<Uuid, false>,
    include_deleted: QueryParam<bool, false>,
    limit: QueryParam<u32, false>,
    offset: QueryParam<u64, false>,
    depot: &mut Depot,
) -> Result<Json<CartsPageResponse>, StatusError> {
    let state = depot.state_or_500()?;

    let (filter, pagination) = selection(user_uuid, include_deleted, limit, offset);

    let page = state
        .app
        .admin
        .list_carts(filter, pagination)
        .await
        .observed("list_carts")?;

    Ok(Json(page.into()))
}
