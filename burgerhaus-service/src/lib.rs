use std::sync::Arc;

use chrono::TimeDelta;
use diesel_async::{
    async_connection_wrapper::AsyncConnectionWrapper,
    pooled_connection::{
        deadpool::{BuildError, Object, Pool},
        AsyncDieselConnectionManager,
    },
    AsyncConnection, AsyncPgConnection,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod schema;
pub mod store;
pub mod uploads;

use auth::TokenService;
use config::AppConfig;
use error::ApiError;
use uploads::UploadStore;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub type DbPool = Pool<AsyncPgConnection>;

/// Builds the shared connection pool. Connections are opened lazily.
pub fn build_pool(database_url: &str, max_size: usize) -> Result<DbPool, BuildError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    Pool::builder(manager).max_size(max_size).build()
}

pub async fn run_migrations(database_url: &str) -> anyhow::Result<()> {
    let conn = AsyncPgConnection::establish(database_url).await?;
    let mut async_wrapper: AsyncConnectionWrapper<AsyncPgConnection> =
        AsyncConnectionWrapper::from(conn);
    tokio::task::spawn_blocking(move || {
        async_wrapper
            .run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("Error while running migrations: {e}"))
    })
    .await??;
    Ok(())
}

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub tokens: Arc<TokenService>,
    pub uploads: UploadStore,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        Self {
            pool,
            tokens: Arc::new(TokenService::new(
                &config.secret_key,
                TimeDelta::hours(config.token_ttl_hours),
            )),
            uploads: UploadStore::new(config.upload_dir.clone()),
            config: Arc::new(config),
        }
    }

    pub async fn conn(&self) -> Result<Object<AsyncPgConnection>, ApiError> {
        Ok(self.pool.get().await?)
    }
}
