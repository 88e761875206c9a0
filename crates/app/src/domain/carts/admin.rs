//! Admin override layer for carts.
//!
//! These operations bypass the lifecycle predicates that guard customer-facing
//! calls: listings see soft-deleted and expired carts, restores ignore the
//! cart version and force deletes are unconditional.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, stream::BoxStream};
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};

use crate::{
    database::Db,
    domain::carts::{
        data::{CartsFilter, Pagination},
        errors::CartsServiceError,
        models::{Cart, CartItem, CartUuid, CartsPage},
        repositories::{PgCartItemsRepository, PgCartsRepository},
    },
};

/// Carts fetched per round trip while exporting.
pub const DEFAULT_EXPORT_BATCH_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct PgCartsAdminService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    export_batch_size: u32,
}

impl PgCartsAdminService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            export_batch_size: DEFAULT_EXPORT_BATCH_SIZE,
        }
    }

    /// Override the export batch size. Zero is treated as one.
    #[must_use]
    pub fn with_export_batch_size(mut self, batch_size: u32) -> Self {
        self.export_batch_size = batch_size.max(1);
        self
    }

    async fn fetch_carts(
        &self,
        filter: CartsFilter,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Cart>, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut carts = self
            .carts_repository
            .list_carts(&mut tx, filter, limit, offset)
            .await?;

        self.attach_items(&mut tx, &mut carts).await?;

        tx.commit().await?;

        Ok(carts)
    }

    async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        carts: &mut [Cart],
    ) -> Result<(), CartsServiceError> {
        if carts.is_empty() {
            return Ok(());
        }

        let uuids: Vec<CartUuid> = carts.iter().map(|cart| cart.uuid).collect();

        let items = self.items_repository.get_items_for_carts(tx, &uuids).await?;

        let mut by_cart: FxHashMap<CartUuid, Vec<CartItem>> = FxHashMap::default();

        for item in items {
            by_cart.entry(item.cart_uuid).or_default().push(item);
        }

        for cart in carts {
            if let Some(items) = by_cart.remove(&cart.uuid) {
                cart.items = items;
            }
        }

        Ok(())
    }
}

/// Position of an in-progress export.
struct ExportCursor {
    service: PgCartsAdminService,
    filter: CartsFilter,
    offset: u64,
    remaining: Option<u64>,
    exhausted: bool,
}

async fn next_export_batch(
    mut cursor: ExportCursor,
) -> Result<Option<(Vec<Cart>, ExportCursor)>, CartsServiceError> {
    if cursor.exhausted || cursor.remaining == Some(0) {
        return Ok(None);
    }

    let batch_size = u64::from(cursor.service.export_batch_size);
    let wanted = cursor.remaining.map_or(batch_size, |remaining| remaining.min(batch_size));
    let limit = u32::try_from(wanted).unwrap_or(cursor.service.export_batch_size);

    let carts = cursor
        .service
        .fetch_carts(cursor.filter, limit, cursor.offset)
        .await?;

    if carts.is_empty() {
        return Ok(None);
    }

    let fetched = u64::try_from(carts.len()).unwrap_or(u64::MAX);

    tracing::debug!(offset = cursor.offset, fetched, "exported carts batch");

    cursor.offset = cursor.offset.saturating_add(fetched);
    cursor.remaining = cursor.remaining.map(|remaining| remaining.saturating_sub(fetched));
    cursor.exhausted = fetched < u64::from(limit);

    Ok(Some((carts, cursor)))
}

#[async_trait]
impl CartsAdminService for PgCartsAdminService {
    #[tracing::instrument(
        name = "carts.admin.list_carts",
        skip(self),
        fields(returned = tracing::field::Empty, total = tracing::field::Empty),
        err
    )]
    async fn list_carts(
        &self,
        filter: CartsFilter,
        pagination: Pagination,
    ) -> Result<CartsPage, CartsServiceError> {
        let limit = pagination.page_limit()?;
        let offset = pagination.checked_offset()?;

        let mut tx = self.db.begin_transaction().await?;

        let mut carts = self
            .carts_repository
            .list_carts(&mut tx, filter, limit, offset)
            .await?;

        let total = self.carts_repository.count_carts(&mut tx, filter).await?;

        self.attach_items(&mut tx, &mut carts).await?;

        tx.commit().await?;

        let span = tracing::Span::current();

        span.record("returned", carts.len());
        span.record("total", total);

        Ok(CartsPage { carts, total })
    }

    #[tracing::instrument(
        name = "carts.admin.restore_cart",
        skip(self),
        fields(cart_uuid = %cart),
        err
    )]
    async fn restore_cart(&self, cart: CartUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut restored = self
            .carts_repository
            .restore_cart(&mut tx, cart, Timestamp::now())
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        restored.items = self.items_repository.get_cart_items(&mut tx, cart).await?;

        tx.commit().await?;

        tracing::info!(version = restored.version, "restored cart");

        Ok(restored)
    }

    #[tracing::instrument(
        name = "carts.admin.force_delete_cart",
        skip(self),
        fields(cart_uuid = %cart, items_removed = tracing::field::Empty),
        err
    )]
    async fn force_delete_cart(&self, cart: CartUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let items_removed = self.items_repository.clear_cart_items(&mut tx, cart).await?;

        let rows_affected = self.carts_repository.delete_cart(&mut tx, cart).await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        tx.commit().await?;

        tracing::Span::current().record("items_removed", items_removed);

        Ok(())
    }

    fn export_carts(
        &self,
        filter: CartsFilter,
        pagination: Pagination,
    ) -> BoxStream<'static, Result<Cart, CartsServiceError>> {
        let offset = match pagination.checked_offset() {
            Ok(offset) => offset,
            Err(error) => return futures::stream::once(async { Err(error) }).boxed(),
        };

        let cursor = ExportCursor {
            service: self.clone(),
            filter,
            offset,
            remaining: pagination.limit.map(u64::from),
            exhausted: false,
        };

        futures::stream::try_unfold(cursor, next_export_batch)
            .map_ok(|carts| {
                futures::stream::iter(carts.into_iter().map(Ok::<Cart, CartsServiceError>))
            })
            .try_flatten()
            .boxed()
    }
}

#[automock]
#[async_trait]
pub trait CartsAdminService: Send + Sync {
    /// List carts regardless of expiry, optionally including soft-deleted ones.
    async fn list_carts(
        &self,
        filter: CartsFilter,
        pagination: Pagination,
    ) -> Result<CartsPage, CartsServiceError>;

    /// Clear the soft-delete marker and advance the version.
    ///
    /// No expected version is checked and the expiry is left as it was.
    async fn restore_cart(&self, cart: CartUuid) -> Result<Cart, CartsServiceError>;

    /// Permanently delete a cart and its items.
    async fn force_delete_cart(&self, cart: CartUuid) -> Result<(), CartsServiceError>;

    /// Stream matching carts with their items, fetching lazily in batches.
    ///
    /// `pagination.limit` caps the number of carts streamed; `None` streams
    /// everything after `pagination.offset`.
    fn export_carts(
        &self,
        filter: CartsFilter,
        pagination: Pagination,
    ) -> BoxStream<'static, Result<Cart, CartsServiceError>>;
}

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;
    use testresult::TestResult;

    use crate::{
        domain::carts::{
            CartsService,
            data::{CartsFilter, Pagination},
            models::{ProductUuid, UserUuid},
        },
        test::{TestContext, helpers::add_product},
    };

    use super::*;

    async fn seed_carts(ctx: &TestContext, count: usize) -> TestResult<Vec<Cart>> {
        let mut carts = Vec::with_capacity(count);

        for _ in 0..count {
            let cart = ctx.carts.get_or_create_cart(UserUuid::new()).await?;
            carts.push(add_product(ctx, cart.uuid, ProductUuid::new(), 1, None).await?);
        }

        Ok(carts)
    }

    #[tokio::test]
    async fn list_carts_excludes_soft_deleted_unless_requested() -> TestResult {
        let ctx = TestContext::new().await;
        let carts = seed_carts(&ctx, 3).await?;

        ctx.carts
            .soft_delete_cart(carts[1].uuid, carts[1].version)
            .await?;

        let active = ctx
            .admin
            .list_carts(CartsFilter::default(), Pagination::default())
            .await?;

        let all = ctx
            .admin
            .list_carts(
                CartsFilter {
                    include_deleted: true,
                    ..CartsFilter::default()
                },
                Pagination::default(),
            )
            .await?;

        assert_eq!(active.total, 2);
        assert!(active.carts.iter().all(|cart| cart.uuid != carts[1].uuid));
        assert_eq!(all.total, 3);
        assert!(all.carts.iter().any(|cart| cart.deleted_at.is_some()));

        Ok(())
    }

    #[tokio::test]
    async fn list_carts_includes_expired_carts_with_items() -> TestResult {
        let ctx = TestContext::new().await;
        let carts = seed_carts(&ctx, 1).await?;
        ctx.expire_cart(carts[0].uuid).await;

        let page = ctx
            .admin
            .list_carts(CartsFilter::default(), Pagination::default())
            .await?;

        assert_eq!(page.total, 1);
        assert_eq!(page.carts[0].uuid, carts[0].uuid);
        assert_eq!(page.carts[0].items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn list_carts_filters_by_user() -> TestResult {
        let ctx = TestContext::new().await;
        let carts = seed_carts(&ctx, 3).await?;

        let page = ctx
            .admin
            .list_carts(
                CartsFilter {
                    user_uuid: Some(carts[2].user_uuid),
                    include_deleted: false,
                },
                Pagination::default(),
            )
            .await?;

        assert_eq!(page.total, 1);
        assert_eq!(page.carts[0].uuid, carts[2].uuid);

        Ok(())
    }

    #[tokio::test]
    async fn list_carts_pages_in_creation_order_with_full_total() -> TestResult {
        let ctx = TestContext::new().await;
        let carts = seed_carts(&ctx, 5).await?;

        let page = ctx
            .admin
            .list_carts(
                CartsFilter::default(),
                Pagination {
                    limit: Some(2),
                    offset: 1,
                },
            )
            .await?;

        let uuids: Vec<CartUuid> = page.carts.iter().map(|cart| cart.uuid).collect();

        assert_eq!(page.total, 5);
        assert_eq!(uuids, vec![carts[1].uuid, carts[2].uuid]);

        Ok(())
    }

    #[tokio::test]
    async fn list_carts_rejects_invalid_limits() {
        let ctx = TestContext::new().await;

        let result = ctx
            .admin
            .list_carts(
                CartsFilter::default(),
                Pagination {
                    limit: Some(0),
                    offset: 0,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidArgument(_))),
            "expected InvalidArgument, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_and_export_reject_offsets_out_of_range() {
        let ctx = TestContext::new().await;
        let pagination = Pagination {
            limit: None,
            offset: u64::MAX,
        };

        let listed = ctx.admin.list_carts(CartsFilter::default(), pagination).await;

        assert!(
            matches!(listed, Err(CartsServiceError::InvalidArgument("offset out of range"))),
            "expected InvalidArgument from list, got {listed:?}"
        );

        let exported: Result<Vec<Cart>, CartsServiceError> = ctx
            .admin
            .export_carts(CartsFilter::default(), pagination)
            .try_collect()
            .await;

        assert!(
            matches!(exported, Err(CartsServiceError::InvalidArgument("offset out of range"))),
            "expected InvalidArgument from export, got {exported:?}"
        );
    }

    #[tokio::test]
    async fn restore_cart_reactivates_and_bumps_version() -> TestResult {
        let ctx = TestContext::new().await;
        let carts = seed_carts(&ctx, 1).await?;
        let cart = &carts[0];

        ctx.carts.soft_delete_cart(cart.uuid, cart.version).await?;

        let restored = ctx.admin.restore_cart(cart.uuid).await?;

        assert!(restored.deleted_at.is_none());
        assert_eq!(restored.version, cart.version + 2);
        assert_eq!(restored.items.len(), 1);
        assert_eq!(restored.expires_at, cart.expires_at);

        let fetched = ctx.carts.get_cart(cart.uuid).await?;

        assert_eq!(fetched.version, restored.version);

        Ok(())
    }

    #[tokio::test]
    async fn restore_cart_does_not_revive_expired_carts() -> TestResult {
        let ctx = TestContext::new().await;
        let carts = seed_carts(&ctx, 1).await?;
        let cart = &carts[0];

        ctx.carts.soft_delete_cart(cart.uuid, cart.version).await?;
        ctx.expire_cart(cart.uuid).await;

        ctx.admin.restore_cart(cart.uuid).await?;

        let result = ctx.carts.get_cart(cart.uuid).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFoundOrExpired)),
            "expected NotFoundOrExpired, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn restore_cart_on_active_cart_bumps_version() -> TestResult {
        let ctx = TestContext::new().await;
        let carts = seed_carts(&ctx, 1).await?;
        let cart = &carts[0];

        let restored = ctx.admin.restore_cart(cart.uuid).await?;

        assert!(restored.deleted_at.is_none(), "cart stays active");
        assert_eq!(restored.version, cart.version + 1, "version advanced");
        assert_eq!(ctx.carts.get_cart(cart.uuid).await?.version, restored.version);

        Ok(())
    }

    #[tokio::test]
    async fn restore_cart_rejects_unknown_carts() {
        let ctx = TestContext::new().await;

        let result = ctx.admin.restore_cart(CartUuid::new()).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn force_delete_cart_removes_cart_and_items() -> TestResult {
        let ctx = TestContext::new().await;
        let carts = seed_carts(&ctx, 1).await?;
        let cart = &carts[0];

        ctx.admin.force_delete_cart(cart.uuid).await?;

        assert_eq!(ctx.count_items(cart.uuid).await, 0);

        let again = ctx.admin.force_delete_cart(cart.uuid).await;
        let restore = ctx.admin.restore_cart(cart.uuid).await;

        assert!(
            matches!(again, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {again:?}"
        );
        assert!(
            matches!(restore, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {restore:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn force_delete_cart_ignores_deletion_and_expiry_state() -> TestResult {
        let ctx = TestContext::new().await;
        let carts = seed_carts(&ctx, 2).await?;

        ctx.carts
            .soft_delete_cart(carts[0].uuid, carts[0].version)
            .await?;
        ctx.expire_cart(carts[1].uuid).await;

        for cart in &carts {
            ctx.admin.force_delete_cart(cart.uuid).await?;
        }

        let page = ctx
            .admin
            .list_carts(
                CartsFilter {
                    include_deleted: true,
                    ..CartsFilter::default()
                },
                Pagination::default(),
            )
            .await?;

        assert_eq!(page.total, 0);

        Ok(())
    }

    #[tokio::test]
    async fn export_carts_streams_every_cart_across_batches() -> TestResult {
        let ctx = TestContext::new().await;
        let carts = seed_carts(&ctx, 5).await?;
        let admin = ctx.admin.clone().with_export_batch_size(2);

        let exported: Vec<Cart> = admin
            .export_carts(CartsFilter::default(), Pagination::default())
            .try_collect()
            .await?;

        let uuids: Vec<CartUuid> = exported.iter().map(|cart| cart.uuid).collect();
        let expected: Vec<CartUuid> = carts.iter().map(|cart| cart.uuid).collect();

        assert_eq!(uuids, expected);
        assert!(exported.iter().all(|cart| cart.items.len() == 1));

        Ok(())
    }

    #[tokio::test]
    async fn export_carts_honours_offset_and_limit() -> TestResult {
        let ctx = TestContext::new().await;
        let carts = seed_carts(&ctx, 5).await?;
        let admin = ctx.admin.clone().with_export_batch_size(2);

        let exported: Vec<Cart> = admin
            .export_carts(
                CartsFilter::default(),
                Pagination {
                    limit: Some(3),
                    offset: 1,
                },
            )
            .try_collect()
            .await?;

        let uuids: Vec<CartUuid> = exported.iter().map(|cart| cart.uuid).collect();

        assert_eq!(uuids, vec![carts[1].uuid, carts[2].uuid, carts[3].uuid]);

        Ok(())
    }

    #[tokio::test]
    async fn export_carts_has_no_side_effects_and_restarts() -> TestResult {
        let ctx = TestContext::new().await;
        let carts = seed_carts(&ctx, 3).await?;

        let first: Vec<Cart> = ctx
            .admin
            .export_carts(CartsFilter::default(), Pagination::default())
            .try_collect()
            .await?;

        let second: Vec<Cart> = ctx
            .admin
            .export_carts(CartsFilter::default(), Pagination::default())
            .try_collect()
            .await?;

        assert_eq!(first, second);
        assert_eq!(first.len(), carts.len());
        assert_eq!(first[0].version, carts[0].version);
        assert_eq!(first[0].last_activity_at, carts[0].last_activity_at);

        Ok(())
    }

    #[tokio::test]
    async fn export_carts_on_empty_store_yields_nothing() -> TestResult {
        let ctx = TestContext::new().await;

        let exported: Vec<Cart> = ctx
            .admin
            .export_carts(CartsFilter::default(), Pagination::default())
            .try_collect()
            .await?;

        assert!(exported.is_empty());

        Ok(())
    }
}
