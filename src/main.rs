//! Applies the embedded schema migrations and checks the pool can serve a
//! connection.

use behavior_groups::{config::Config, initialize_db_pool, logging::init_logging, run_migrations};
use diesel_async::RunQueryDsl;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = Config::from_env()?;

    let database_url = config.database_url.clone();
    let applied = tokio::task::spawn_blocking(move || run_migrations(&database_url)).await??;
    if applied.is_empty() {
        log::info!("Schema is up to date");
    } else {
        for version in &applied {
            log::info!("Applied migration {}", version);
        }
    }

    let pool = initialize_db_pool(&config).await?;
    let mut conn = pool.get().await?;
    diesel::sql_query("SELECT 1").execute(&mut conn).await?;
    log::info!(
        "Database ready (pool max_size={}, min_idle={})",
        config.pool.max_size,
        config.pool.min_idle
    );
    Ok(())
}
