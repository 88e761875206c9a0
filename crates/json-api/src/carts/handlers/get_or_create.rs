//! Get Or Create Cart Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{errors::CartsResultExt as _, responses::CartResponse},
    extensions::*,
};

/// Get Or Create Cart Handler
///
/// Returns the user's active cart, creating an empty one when none exists.
#[endpoint(
    tags("carts"),
    summary = "Get Or Create Cart",
    responses(
        (status_code = StatusCode::OK, description = "Active cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.state_or_500()?;

    let cart = state
        .app
        .carts
        .get_or_create_cart(user.into_inner().into())
        .await
        .observed("get_or_create_cart")?;

    Ok(Json(cart.into()))
}
