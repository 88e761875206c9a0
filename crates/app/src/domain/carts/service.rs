//! Carts service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};

use crate::{
    database::Db,
    domain::carts::{
        data::{CartItemUpdate, NewCartItem},
        errors::CartsServiceError,
        lifecycle,
        models::{Cart, CartHead, CartItemUuid, CartUuid, UserUuid},
        repositories::{PgCartItemsRepository, PgCartsRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
        }
    }

    /// Lock the cart row and check it can be mutated by a caller that last saw `expected_version`.
    async fn lock_for_mutation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        expected_version: Option<u64>,
        now: Timestamp,
    ) -> Result<CartHead, CartsServiceError> {
        let head = self
            .carts_repository
            .lock_cart(tx, cart)
            .await?
            .ok_or(CartsServiceError::NotFoundOrExpired)?;

        lifecycle::ensure_mutable(&head, expected_version, now)?;

        Ok(head)
    }

    /// Advance the version and TTL of a locked cart, then read it back.
    async fn finish_mutation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        head: &CartHead,
        now: Timestamp,
    ) -> Result<Cart, CartsServiceError> {
        let expires_at = lifecycle::renewed_expiry(now)?;

        let rows_affected = self
            .carts_repository
            .bump_cart(tx, head.uuid, head.version, now, expires_at)
            .await?;

        if rows_affected != 1 {
            return Err(CartsServiceError::VersionConflict {
                expected: head.version,
            });
        }

        self.load_cart(tx, head.uuid)
            .await?
            .ok_or(CartsServiceError::NotFoundOrExpired)
    }

    async fn load_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Option<Cart>, CartsServiceError> {
        let Some(mut cart) = self.carts_repository.get_cart(tx, cart).await? else {
            return Ok(None);
        };

        cart.items = self.items_repository.get_cart_items(tx, cart.uuid).await?;

        Ok(Some(cart))
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    #[tracing::instrument(
        name = "carts.service.get_or_create_cart",
        skip(self),
        fields(user_uuid = %user, cart_uuid = tracing::field::Empty, created = tracing::field::Empty),
        err
    )]
    async fn get_or_create_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let user = lifecycle::validate_user(user)?;
        let now = Timestamp::now();
        let expires_at = lifecycle::renewed_expiry(now)?;

        let mut tx = self.db.begin_transaction().await?;

        self.carts_repository.lock_user_carts(&mut tx, user).await?;

        let existing = self
            .carts_repository
            .find_active_cart_for_user(&mut tx, user, now)
            .await?;

        let (cart, created) = match existing {
            Some(cart) => {
                self.carts_repository
                    .touch_cart(&mut tx, cart.uuid, now, expires_at)
                    .await?;

                let cart = self
                    .load_cart(&mut tx, cart.uuid)
                    .await?
                    .ok_or(CartsServiceError::NotFoundOrExpired)?;

                (cart, false)
            }
            None => {
                let cart = self
                    .carts_repository
                    .create_cart(&mut tx, CartUuid::new(), user, expires_at, now)
                    .await?;

                (cart, true)
            }
        };

        tx.commit().await?;

        let span = tracing::Span::current();

        span.record("cart_uuid", tracing::field::display(cart.uuid));
        span.record("created", created);

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.get_cart",
        skip(self),
        fields(cart_uuid = %cart),
        err
    )]
    async fn get_cart(&self, cart: CartUuid) -> Result<Cart, CartsServiceError> {
        let now = Timestamp::now();
        let expires_at = lifecycle::renewed_expiry(now)?;

        let mut tx = self.db.begin_transaction().await?;

        let head = self
            .carts_repository
            .lock_cart(&mut tx, cart)
            .await?
            .ok_or(CartsServiceError::NotFoundOrExpired)?;

        if !lifecycle::is_active(&head, now) {
            return Err(CartsServiceError::NotFoundOrExpired);
        }

        self.carts_repository
            .touch_cart(&mut tx, cart, now, expires_at)
            .await?;

        let cart = self
            .load_cart(&mut tx, cart)
            .await?
            .ok_or(CartsServiceError::NotFoundOrExpired)?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(
            cart_uuid = %cart,
            product_uuid = %item.product_uuid,
            quantity = item.quantity,
            expected_version = ?item.expected_version
        ),
        err
    )]
    async fn add_item(&self, cart: CartUuid, item: NewCartItem) -> Result<Cart, CartsServiceError> {
        let quantity = lifecycle::validate_quantity(item.quantity)?;
        let product = lifecycle::validate_product(item.product_uuid)?;
        let now = Timestamp::now();

        let mut tx = self.db.begin_transaction().await?;

        let head = self
            .lock_for_mutation(&mut tx, cart, item.expected_version, now)
            .await?;

        self.items_repository
            .merge_cart_item(&mut tx, cart, product, quantity, now)
            .await?;

        let cart = self.finish_mutation(&mut tx, &head, now).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.update_item",
        skip(self, update),
        fields(
            cart_uuid = %cart,
            item_uuid = %item,
            quantity = update.quantity,
            expected_version = update.expected_version
        ),
        err
    )]
    async fn update_item(
        &self,
        cart: CartUuid,
        item: CartItemUuid,
        update: CartItemUpdate,
    ) -> Result<Cart, CartsServiceError> {
        let quantity = lifecycle::validate_quantity(update.quantity)?;
        let now = Timestamp::now();

        let mut tx = self.db.begin_transaction().await?;

        let head = self
            .lock_for_mutation(&mut tx, cart, Some(update.expected_version), now)
            .await?;

        let rows_affected = self
            .items_repository
            .update_cart_item(&mut tx, cart, item, quantity, now)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::ItemNotFound);
        }

        let cart = self.finish_mutation(&mut tx, &head, now).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(cart_uuid = %cart, item_uuid = %item),
        err
    )]
    async fn remove_item(
        &self,
        cart: CartUuid,
        item: CartItemUuid,
        expected_version: u64,
    ) -> Result<Cart, CartsServiceError> {
        let now = Timestamp::now();

        let mut tx = self.db.begin_transaction().await?;

        let head = self
            .lock_for_mutation(&mut tx, cart, Some(expected_version), now)
            .await?;

        let rows_affected = self
            .items_repository
            .delete_cart_item(&mut tx, cart, item)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::ItemNotFound);
        }

        let cart = self.finish_mutation(&mut tx, &head, now).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.clear_cart",
        skip(self),
        fields(cart_uuid = %cart, removed = tracing::field::Empty),
        err
    )]
    async fn clear_cart(
        &self,
        cart: CartUuid,
        expected_version: u64,
    ) -> Result<Cart, CartsServiceError> {
        let now = Timestamp::now();

        let mut tx = self.db.begin_transaction().await?;

        let head = self
            .lock_for_mutation(&mut tx, cart, Some(expected_version), now)
            .await?;

        let removed = self.items_repository.clear_cart_items(&mut tx, cart).await?;

        let cart = self.finish_mutation(&mut tx, &head, now).await?;

        tx.commit().await?;

        tracing::Span::current().record("removed", removed);

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.soft_delete_cart",
        skip(self),
        fields(cart_uuid = %cart),
        err
    )]
    async fn soft_delete_cart(
        &self,
        cart: CartUuid,
        expected_version: u64,
    ) -> Result<(), CartsServiceError> {
        let now = Timestamp::now();

        let mut tx = self.db.begin_transaction().await?;

        let head = self
            .lock_for_mutation(&mut tx, cart, Some(expected_version), now)
            .await?;

        let rows_affected = self
            .carts_repository
            .soft_delete_cart(&mut tx, cart, head.version, now)
            .await?;

        if rows_affected != 1 {
            return Err(CartsServiceError::VersionConflict {
                expected: expected_version,
            });
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Return the user's active cart, creating an empty one if none exists.
    ///
    /// Reuse renews the TTL without advancing the version.
    async fn get_or_create_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;

    /// Retrieve an active cart with its items, renewing its TTL.
    async fn get_cart(&self, cart: CartUuid) -> Result<Cart, CartsServiceError>;

    /// Add a product line, merging into an existing line for the same product.
    async fn add_item(&self, cart: CartUuid, item: NewCartItem) -> Result<Cart, CartsServiceError>;

    /// Replace the quantity of one line.
    async fn update_item(
        &self,
        cart: CartUuid,
        item: CartItemUuid,
        update: CartItemUpdate,
    ) -> Result<Cart, CartsServiceError>;

    async fn remove_item(
        &self,
        cart: CartUuid,
        item: CartItemUuid,
        expected_version: u64,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove every line from the cart.
    async fn clear_cart(
        &self,
        cart: CartUuid,
        expected_version: u64,
    ) -> Result<Cart, CartsServiceError>;

    /// Mark the cart deleted. Only an admin restore brings it back.
    async fn soft_delete_cart(
        &self,
        cart: CartUuid,
        expected_version: u64,
    ) -> Result<(), CartsServiceError>;
}
