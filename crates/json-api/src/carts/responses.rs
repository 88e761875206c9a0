//! Wire representations of carts.
//!
//! Each domain entity has one explicit mapping here; handlers never serialise
//! domain models directly.

use std::string::ToString;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trolley_app::carts::models::{Cart, CartItem, CartsPage};

/// Cart Response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    /// The user that owns the cart
    pub user_uuid: Uuid,

    /// Optimistic-lock version; send it back with the next mutation
    pub version: u64,

    /// The items in the cart
    pub items: Vec<CartItemResponse>,

    /// When the cart stops being accessible unless touched again
    pub expires_at: String,

    /// The last successful read or mutation
    pub last_activity_at: String,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,

    /// The date and time the cart was deleted
    pub deleted_at: Option<String>,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        CartResponse {
            uuid: cart.uuid.into(),
            user_uuid: cart.user_uuid.into(),
            version: cart.version,
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            expires_at: cart.expires_at.to_string(),
            last_activity_at: cart.last_activity_at.to_string(),
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
            deleted_at: cart.deleted_at.as_ref().map(ToString::to_string),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart item
    pub uuid: Uuid,

    /// The product on this line
    pub product_uuid: Uuid,

    /// How many units of the product are in the cart
    pub quantity: u32,

    /// The date and time the line was created
    pub created_at: String,

    /// The date and time the line was last updated
    pub updated_at: String,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            uuid: item.uuid.into(),
            product_uuid: item.product_uuid.into(),
            quantity: item.quantity,
            created_at: item.created_at.to_string(),
            updated_at: item.updated_at.to_string(),
        }
    }
}

/// Carts Page Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartsPageResponse {
    /// Carts on this page
    pub carts: Vec<CartResponse>,

    /// Number of carts matching the filter across all pages
    pub total: u64,
}

impl From<CartsPage> for CartsPageResponse {
    fn from(page: CartsPage) -> Self {
        Self {
            carts: page.carts.into_iter().map(CartResponse::from).collect(),
            total: page.total,
        }
    }
}

/// Result of a delete.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DeletedResponse {
    /// The deleted cart
    pub uuid: Uuid,

    /// Always `true`; failures are reported with an error status
    pub success: bool,
}
