//! Restore Cart Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{errors::CartsResultExt as _, responses::CartResponse},
    extensions::*,
};

/// Restore Cart Handler
///
/// Clears the soft-delete marker. The expiry is left unchanged.
#[endpoint(
    tags("admin"),
    summary = "Restore Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Restored cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let cart = cart.into_inner();

    let restored = state
        .app
        .admin
        .restore_cart(cart.into())
        .await
        .observed("restore_cart")?;

    tracing::info!(cart_uuid = %cart, version = restored.version, "restored cart");

    Ok(Json(restored.into()))
}

#[cfg(test)]
mod tests {
    use salvo::{
        http::header::AUTHORIZATION,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use trolley_app::carts::{CartsServiceError, MockCartsAdminService, models::CartUuid};

    use crate::test_helpers::{TEST_ADMIN_TOKEN, admin_service, bearer, make_cart};

    use super::*;

    fn make_service(admin: MockCartsAdminService) -> Service {
        admin_service(
            admin,
            Router::with_path("admin/carts/{cart}/restore").post(handler),
        )
    }

    #[tokio::test]
    async fn test_restore_returns_cart() -> TestResult {
        let uuid = CartUuid::new();
        let mut cart = make_cart(uuid);
        cart.version = 4;

        let mut admin = MockCartsAdminService::new();

        admin
            .expect_restore_cart()
            .once()
            .withf(move |c| *c == uuid)
            .return_once(move |_| Ok(cart));

        let mut res = TestClient::post(format!("http://example.com/admin/carts/{uuid}/restore"))
            .add_header(AUTHORIZATION, bearer(TEST_ADMIN_TOKEN), true)
            .send(&make_service(admin))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK), "status");
        assert_eq!(body.version, 4, "version");
        assert!(body.deleted_at.is_none(), "restored cart has no deletion marker");

        Ok(())
    }

    #[tokio::test]
    async fn test_restore_unknown_cart_returns_404() {
        let mut admin = MockCartsAdminService::new();

        admin
            .expect_restore_cart()
            .once()
            .return_once(|_| Err(CartsServiceError::NotFound));

        let res = TestClient::post(format!(
            "http://example.com/admin/carts/{}/restore",
            CartUuid::new()
        ))
        .add_header(AUTHORIZATION, bearer(TEST_ADMIN_TOKEN), true)
        .send(&make_service(admin))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND), "status");
    }
}
