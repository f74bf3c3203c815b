pub mod create;
pub mod records;
pub mod sqlite;
pub mod store;
pub mod utils;

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use shared::types::DatabaseConfig;

pub use self::records::*;
pub use self::sqlite::SqliteStore;
pub use self::store::{Store, StoreError};

/// Open the connection pool and make sure the schema exists.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("Invalid database url: {}", config.url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database {}", config.url))?;

    create::create_tables(&pool)
        .await
        .context("Failed to create database schema")?;

    info!("Database ready at {}", config.url);
    Ok(pool)
}
