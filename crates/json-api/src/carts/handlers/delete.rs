//! Delete Cart Handler

use salvo::{
    oapi::extract::{PathParam, QueryParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    carts::{errors::CartsResultExt as _, responses::DeletedResponse},
    extensions::*,
};

/// Delete Cart Handler
///
/// Soft-deletes the cart. `version` must match the cart's current version.
#[endpoint(
    tags("carts"),
    summary = "Delete Cart",
    responses(
        (status_code = StatusCode::OK, description = "Cart deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found or expired"),
        (status_code = StatusCode::CONFLICT, description = "Stale version"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    version: QueryParam<u64, true>,
    depot: &mut Depot,
) -> Result<Json<DeletedResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let cart = cart.into_inner();
    let version = version.into_inner();

    state
        .app
        .carts
        .soft_delete_cart(cart.into(), version)
        .await
        .observed("soft_delete_cart")?;

    tracing::info!(cart_uuid = %cart, version, "soft-deleted cart");

    Ok(Json(DeletedResponse {
        uuid: cart,
        success: true,
    }))
}
