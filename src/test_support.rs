use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

/// A migrated, private in-memory database.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    crate::store::migrate(&pool).await.expect("migrations");
    pool
}
