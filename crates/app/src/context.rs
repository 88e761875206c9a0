//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    carts::{CartsAdminService, CartsService, PgCartsAdminService, PgCartsService},
    database::{self, Db},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrations(#[source] sqlx::migrate::MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartsService>,
    pub admin: Arc<dyn CartsAdminService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// When `run_migrations` is set the embedded migrations are applied before
    /// the services are constructed.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or migrating fails.
    pub async fn from_database_url(url: &str, run_migrations: bool) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        if run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrations)?;
        }

        Ok(Self::from_db(Db::new(pool)))
    }

    #[must_use]
    pub fn from_db(db: Db) -> Self {
        Self {
            carts: Arc::new(PgCartsService::new(db.clone())),
            admin: Arc::new(PgCartsAdminService::new(db)),
        }
    }
}
