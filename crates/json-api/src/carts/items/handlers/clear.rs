//! Clear Cart Handler

use salvo::{
    oapi::extract::{PathParam, QueryParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    carts::{errors::CartsResultExt as _, responses::CartResponse},
    extensions::*,
};

/// Clear Cart Handler
///
/// Removes every line. The version advances even when the cart was empty.
#[endpoint(
    tags("carts"),
    summary = "Clear Cart",
    responses(
        (status_code = StatusCode::OK, description = "Emptied cart"),
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
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.state_or_500()?;

    let cart = state
        .app
        .carts
        .clear_cart(cart.into_inner().into(), version.into_inner())
        .await
        .observed("clear_cart")?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use trolley_app::carts::{CartsServiceError, MockCartsService, models::CartUuid};

    use crate::test_helpers::{carts_service, make_cart};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("carts/{cart}/items").delete(handler))
    }

    #[tokio::test]
    async fn test_clear_cart_returns_empty_cart() -> TestResult {
        let uuid = CartUuid::new();
        let mut cart = make_cart(uuid);
        cart.version = 5;

        let mut carts = MockCartsService::new();

        carts
            .expect_clear_cart()
            .once()
            .withf(move |c, version| *c == uuid && *version == 4)
            .return_once(move |_, _| Ok(cart));

        let mut res = TestClient::delete(format!("http://example.com/carts/{uuid}/items?version=4"))
            .send(&make_service(carts))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK), "status");
        assert!(body.items.is_empty(), "cart should be empty");
        assert_eq!(body.version, 5, "version after clear");

        Ok(())
    }

    #[tokio::test]
    async fn test_clear_cart_stale_version_returns_409() -> TestResult {
        let uuid = CartUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_clear_cart()
            .once()
            .return_once(|_, expected| Err(CartsServiceError::VersionConflict { expected }));

        let res = TestClient::delete(format!("http://example.com/carts/{uuid}/items?version=9"))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT), "status");

        Ok(())
    }
}
