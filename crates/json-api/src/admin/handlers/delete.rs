//! Force Delete Cart Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{errors::CartsResultExt as _, responses::DeletedResponse},
    extensions::*,
};

/// Force Delete Cart Handler
///
/// Permanently removes the cart and its items, whatever its state.
#[endpoint(
    tags("admin"),
    summary = "Force Delete Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<DeletedResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let cart = cart.into_inner();

    state
        .app
        .admin
        .force_delete_cart(cart.into())
        .await
        .observed("force_delete_cart")?;

    tracing::info!(cart_uuid = %cart, "force-deleted cart");

    Ok(Json(DeletedResponse {
        uuid: cart,
        success: true,
    }))
}

#[cfg(test)]
mod tests {
    use salvo::{
        http::header::AUTHORIZATION,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use trolley_app::carts::{CartsServiceError, MockCartsAdminService, models::CartUuid};

    use crate::test_helpers::{TEST_ADMIN_TOKEN, admin_service, bearer};

    use super::*;

    fn make_service(admin: MockCartsAdminService) -> Service {
        admin_service(admin, Router::with_path("admin/carts/{cart}").delete(handler))
    }

    #[tokio::test]
    async fn test_force_delete_success() -> TestResult {
        let uuid = CartUuid::new();

        let mut admin = MockCartsAdminService::new();

        admin
            .expect_force_delete_cart()
            .once()
            .withf(move |c| *c == uuid)
            .return_once(|_| Ok(()));

        let mut res = TestClient::delete(format!("http://example.com/admin/carts/{uuid}"))
            .add_header(AUTHORIZATION, bearer(TEST_ADMIN_TOKEN), true)
            .send(&make_service(admin))
            .await;

        let body: DeletedResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK), "status");
        assert_eq!(body.uuid, Uuid::from(uuid), "uuid");
        assert!(body.success, "success flag");

        Ok(())
    }

    #[tokio::test]
    async fn test_force_delete_unknown_cart_returns_404() {
        let mut admin = MockCartsAdminService::new();

        admin
            .expect_force_delete_cart()
            .once()
            .return_once(|_| Err(CartsServiceError::NotFound));

        let res = TestClient::delete(format!("http://example.com/admin/carts/{}", CartUuid::new()))
            .add_header(AUTHORIZATION, bearer(TEST_ADMIN_TOKEN), true)
            .send(&make_service(admin))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND), "status");
    }
}
