//! # Norma DB
//!
//! PostgreSQL pool initialisation and schema migrations.
//!
//! # Example
//!
//! ```ignore
//! use norma_db::{init_db_pool, run_migrations};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = init_db_pool().await?;
//!     run_migrations(&pool).await?;
//!     Ok(())
//! }
//! ```

use sqlx::postgres::PgPoolOptions;
use std::env;
use std::time::Duration;
use tracing::info;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Errors raised while bringing the database up.
#[derive(Debug)]
pub enum DbInitError {
    MissingUrl,
    Connect(sqlx::Error),
    Migrate(sqlx::migrate::MigrateError),
}

impl std::fmt::Display for DbInitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingUrl => write!(f, "DATABASE_URL must be set"),
            Self::Connect(e) => write!(f, "Failed to connect to database: {}", e),
            Self::Migrate(e) => write!(f, "Failed to run migrations: {}", e),
        }
    }
}

impl std::error::Error for DbInitError {}

/// Initializes a PostgreSQL connection pool.
///
/// Reads `DATABASE_URL` and `DATABASE_MAX_CONNECTIONS` (default 10). The
/// returned pool is cheaply cloneable and lives in the application state.
pub async fn init_db_pool() -> Result<PgPool, DbInitError> {
    let database_url = env::var("DATABASE_URL").map_err(|_| DbInitError::MissingUrl)?;
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    connect(&database_url, max_connections).await
}

pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, DbInitError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .map_err(DbInitError::Connect)?;

    info!(max_connections, "Database pool initialized");
    Ok(pool)
}

/// Applies the SQL migrations in `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbInitError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(DbInitError::Migrate)?;

    info!("Database migrations applied");
    Ok(())
}
