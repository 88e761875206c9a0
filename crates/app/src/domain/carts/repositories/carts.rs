//! Carts Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::carts::{
    data::CartsFilter,
    models::{Cart, CartHead, CartUuid, UserUuid},
};

const LOCK_USER_CARTS_SQL: &str = include_str!("../sql/lock_user_carts.sql");
const FIND_ACTIVE_CART_FOR_USER_SQL: &str = include_str!("../sql/find_active_cart_for_user.sql");
const CREATE_CART_SQL: &str = include_str!("../sql/create_cart.sql");
const GET_CART_SQL: &str = include_str!("../sql/get_cart.sql");
const LOCK_CART_SQL: &str = include_str!("../sql/lock_cart.sql");
const TOUCH_CART_SQL: &str = include_str!("../sql/touch_cart.sql");
const BUMP_CART_SQL: &str = include_str!("../sql/bump_cart.sql");
const SOFT_DELETE_CART_SQL: &str = include_str!("../sql/soft_delete_cart.sql");
const RESTORE_CART_SQL: &str = include_str!("../sql/restore_cart.sql");
const DELETE_CART_SQL: &str = include_str!("../sql/delete_cart.sql");
const LIST_CARTS_SQL: &str = include_str!("../sql/list_carts.sql");
const COUNT_CARTS_SQL: &str = include_str!("../sql/count_carts.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Serialize cart creation for one user until the transaction ends.
    pub(crate) async fn lock_user_carts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<(), sqlx::Error> {
        query(LOCK_USER_CARTS_SQL)
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn find_active_cart_for_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        now: Timestamp,
    ) -> Result<Option<Cart>, sqlx::Error> {
        query_as::<Postgres, Cart>(FIND_ACTIVE_CART_FOR_USER_SQL)
            .bind(user.into_uuid())
            .bind(SqlxTimestamp::from(now))
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        user: UserUuid,
        expires_at: Timestamp,
        now: Timestamp,
    ) -> Result<Cart, sqlx::Error> {
        query_as::<Postgres, Cart>(CREATE_CART_SQL)
            .bind(cart.into_uuid())
            .bind(user.into_uuid())
            .bind(SqlxTimestamp::from(expires_at))
            .bind(SqlxTimestamp::from(now))
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch a cart row regardless of its deletion or expiry state.
    pub(crate) async fn get_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Option<Cart>, sqlx::Error> {
        query_as::<Postgres, Cart>(GET_CART_SQL)
            .bind(cart.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Take the row lock that every mutation holds until commit.
    pub(crate) async fn lock_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Option<CartHead>, sqlx::Error> {
        query_as::<Postgres, CartHead>(LOCK_CART_SQL)
            .bind(cart.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Renew the TTL of an active cart without changing its version.
    pub(crate) async fn touch_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        now: Timestamp,
        expires_at: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(TOUCH_CART_SQL)
            .bind(cart.into_uuid())
            .bind(SqlxTimestamp::from(now))
            .bind(SqlxTimestamp::from(expires_at))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Advance the version of an active cart still at `version`, renewing its TTL.
    pub(crate) async fn bump_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        version: u64,
        now: Timestamp,
        expires_at: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(BUMP_CART_SQL)
            .bind(cart.into_uuid())
            .bind(version_to_i64(version)?)
            .bind(SqlxTimestamp::from(now))
            .bind(SqlxTimestamp::from(expires_at))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn soft_delete_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        version: u64,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SOFT_DELETE_CART_SQL)
            .bind(cart.into_uuid())
            .bind(version_to_i64(version)?)
            .bind(SqlxTimestamp::from(now))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn restore_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        now: Timestamp,
    ) -> Result<Option<Cart>, sqlx::Error> {
        query_as::<Postgres, Cart>(RESTORE_CART_SQL)
            .bind(cart.into_uuid())
            .bind(SqlxTimestamp::from(now))
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn delete_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_carts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: CartsFilter,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Cart>, sqlx::Error> {
        query_as::<Postgres, Cart>(LIST_CARTS_SQL)
            .bind(filter.user_uuid.map(UserUuid::into_uuid))
            .bind(filter.include_deleted)
            .bind(i64::from(limit))
            .bind(offset_to_i64(offset)?)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_carts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: CartsFilter,
    ) -> Result<u64, sqlx::Error> {
        let total: i64 = query_scalar(COUNT_CARTS_SQL)
            .bind(filter.user_uuid.map(UserUuid::into_uuid))
            .bind(filter.include_deleted)
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(total).map_err(|e| sqlx::Error::ColumnDecode {
            index: "total".to_string(),
            source: Box::new(e),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Cart {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            version: try_get_u64(row, "version")?,
            items: Vec::new(),
            expires_at: row.try_get::<SqlxTimestamp, _>("expires_at")?.to_jiff(),
            last_activity_at: row
                .try_get::<SqlxTimestamp, _>("last_activity_at")?
                .to_jiff(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CartHead {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            version: try_get_u64(row, "version")?,
            expires_at: row.try_get::<SqlxTimestamp, _>("expires_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

pub(super) fn try_get_u64(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let value: i64 = row.try_get(col)?;

    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

fn version_to_i64(version: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(version).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

fn offset_to_i64(offset: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(offset).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}
