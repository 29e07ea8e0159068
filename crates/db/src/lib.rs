pub mod memory;
pub mod models;
pub mod repositories;
pub mod schema;
pub mod store;

pub use memory::MemoryStore;
pub use store::{MockStore, PgStore, Store};

use std::sync::Arc;

use eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::info;

pub type DbPool = Pool<Postgres>;

/// URL scheme selecting the in-process store.
pub const MEMORY_URL_SCHEME: &str = "memory://";

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Opens the store named by `database_url`.
///
/// `memory://` yields an empty [`MemoryStore`]; anything else is treated as a
/// PostgreSQL URL, and the schema is created if it does not exist yet.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<Arc<dyn Store>> {
    if database_url.starts_with(MEMORY_URL_SCHEME) {
        info!("Using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let pool = create_pool(database_url, max_connections).await?;
    schema::initialize_database(&pool).await?;
    info!("Connected to PostgreSQL");

    Ok(Arc::new(PgStore::new(pool)))
}
