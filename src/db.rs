use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;

/// The ticker shares this pool with the HTTP handlers, so a few
/// connections stay reserved beyond the actix worker count.
pub async fn init_db(database_url: &str) -> MySqlPool {
    MySqlPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .expect("Failed to connect to database")
}
