//! Test Helpers

use crate::{
    domain::carts::{
        CartsService, CartsServiceError,
        data::NewCartItem,
        models::{Cart, CartUuid, ProductUuid},
    },
    test::TestContext,
};

pub(crate) async fn add_product(
    ctx: &TestContext,
    cart: CartUuid,
    product: ProductUuid,
    quantity: u32,
    expected_version: Option<u64>,
) -> Result<Cart, CartsServiceError> {
    ctx.carts
        .add_item(
            cart,
            NewCartItem {
                product_uuid: product,
                quantity,
                expected_version,
            },
        )
        .await
}
