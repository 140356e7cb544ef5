//! # tagfs-db
//!
//! SQLite database layer for tagfs.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for tags, parent edges, files, and file-tag
//!   associations
//! - Embedded migrations
//! - Test fixtures, including an in-memory fake repository implementing the
//!   same contract
//!
//! ## Example
//!
//! ```rust,ignore
//! use tagfs_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:tagfs.sqlite3").await?;
//!     let tags = db.tags.list().await?;
//!     println!("{} tags", tags.len());
//!     Ok(())
//! }
//! ```

pub mod files;
pub mod pool;
pub mod tags;

// Test fixtures for integration tests.
// Always compiled so other crates' integration tests can use them.
pub mod test_fixtures;

// Re-export core types
pub use tagfs_core::*;

pub use files::SqliteFileRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use tags::SqliteTagRepository;

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;

/// Embedded schema migrations, applied on connect.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Escape LIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: SqlitePool,
    /// Tag repository for rows and parent edges.
    pub tags: SqliteTagRepository,
    /// File repository for rows and tag associations.
    pub files: SqliteFileRepository,
}

impl Database {
    /// Connect with default pool configuration and run migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with(database_url, PoolConfig::default()).await
    }

    /// Connect with custom pool configuration and run migrations.
    pub async fn connect_with(database_url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(database_url, config).await?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;

        Ok(Self {
            tags: SqliteTagRepository::new(pool.clone()),
            files: SqliteFileRepository::new(pool.clone()),
            pool,
        })
    }
}
