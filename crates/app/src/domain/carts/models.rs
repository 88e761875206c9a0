//! Cart Models

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

/// Owning user, opaque to this service.
#[derive(Debug)]
pub struct User;

/// User UUID
pub type UserUuid = TypedUuid<User>;

/// Catalog product, opaque to this service.
#[derive(Debug)]
pub struct Product;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Cart Model
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub version: u64,
    pub items: Vec<CartItem>,
    pub expires_at: Timestamp,
    pub last_activity_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Cart {
    /// Whether normal (non-admin) operations can see this cart at `now`.
    #[must_use]
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.deleted_at.is_none() && self.expires_at > now
    }
}

/// CartItem Model
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub uuid: CartItemUuid,
    pub cart_uuid: CartUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The fields of a locked cart row needed to evaluate mutation predicates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartHead {
    pub uuid: CartUuid,
    pub version: u64,
    pub expires_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// One page of an admin listing.
#[derive(Debug, Clone, PartialEq)]
pub struct CartsPage {
    pub carts: Vec<Cart>,
    pub total: u64,
}
