use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;

use crate::config::DatabaseConfig;

pub type Db = Pool<Postgres>;

/// Builds the pool without opening a connection, so the server still starts
/// (and serves fallback data) while the database is down.
pub fn connect(cfg: &DatabaseConfig) -> Result<Db, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .connect_lazy(&cfg.url)
}

pub async fn migrate(db: &Db) -> Result<(), sqlx::migrate::MigrateError> {
    // crate-relative path for sqlx migrations
    sqlx::migrate!("./migrations").run(db).await
}
