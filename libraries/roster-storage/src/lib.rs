//! Roster Storage
//!
//! `SQLite` database layer for Roster.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each feature owns its own queries (`users`,
//!   `microposts`, `sessions`)
//! - **Constraints in the schema**: email uniqueness, cascading deletes and
//!   non-empty columns are enforced by `SQLite`, so concurrent writers can't
//!   break them
//!
//! # Example
//!
//! ```rust,no_run
//! use roster_storage::{LocalStorage, create_pool, run_migrations};
//! use roster_core::{PageRequest, RosterStorage};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://roster.db").await?;
//! run_migrations(&pool).await?;
//!
//! let storage = LocalStorage::new(pool);
//! let users = storage.list_users(PageRequest::first(30)?).await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod microposts;
pub mod sessions;
pub mod users;

pub use context::LocalStorage;
pub use error::StorageError;

use chrono::{DateTime, Utc};
use roster_core::{Result, RosterError};
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
pub async fn run_migrations(pool: &SqlitePool) -> std::result::Result<(), StorageError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://roster.db`
///   or `sqlite::memory:`)
pub async fn create_pool(database_url: &str) -> std::result::Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating pool with URL: {}", database_url);

    let in_memory = database_url.contains(":memory:");

    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(30));
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    // Every connection to an in-memory database gets its own empty database,
    // so keep exactly one open for the life of the pool.
    let pool = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
    } else {
        SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
    }
    .map_err(|e| StorageError::Connection(e.to_string()))?;

    tracing::debug!("Pool created");

    Ok(pool)
}

/// Convert a stored millisecond timestamp
pub(crate) fn timestamp_from_millis(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| RosterError::from(StorageError::CorruptRow(format!("timestamp {millis}"))))
}
