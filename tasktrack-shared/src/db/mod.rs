/// Database layer for TaskTrack
///
/// # Modules
///
/// - `pool`: SQLite connection pool management with health checks
/// - `schema`: Idempotent table bootstrap run at startup
///
/// Queries live in [`crate::repository`].
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::db::{pool::{create_pool, DatabaseConfig}, schema::ensure_schema};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(&DatabaseConfig::default()).await?;
///     ensure_schema(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod pool;
pub mod schema;
