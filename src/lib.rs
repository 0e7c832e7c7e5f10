pub mod config;
pub mod db;
pub mod dtos;
pub mod error;
pub mod logging;
pub mod models;
pub mod reconcile;
pub mod schema;
pub mod validation;

use diesel::{Connection, PgConnection};
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::config::Config;

/// Short-hand for the database pool type to use throughout the app.
pub type DbPool = bb8::Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

pub type Conn<'a> = bb8::PooledConnection<'a, AsyncDieselConnectionManager<AsyncPgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Build the connection pool from configuration.
pub async fn initialize_db_pool(config: &Config) -> Result<DbPool, error::BehaviorGroupError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
    bb8::Pool::builder()
        .max_size(config.pool.max_size)
        .min_idle(Some(config.pool.min_idle))
        .idle_timeout(Some(config.pool.idle_timeout))
        .connection_timeout(config.pool.connection_timeout)
        .build(manager)
        .await
        .map_err(|e| error::BehaviorGroupError::Pool(e.to_string()))
}

/// Apply pending migrations over a blocking connection.
///
/// Returns the versions that were applied.
pub fn run_migrations(database_url: &str) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = PgConnection::establish(database_url)?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    Ok(applied.into_iter().map(|v| v.to_string()).collect())
}
