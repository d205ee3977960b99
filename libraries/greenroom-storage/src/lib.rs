//! Greenroom Storage
//!
//! `SQLite` persistence for the parts of the client that must survive a
//! restart: the offline pending-play queue, the signed-in session, and small
//! settings such as the scrobbling toggle.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each feature owns its own queries and logic
//! - **Offline-First**: Plays are queued locally and drained by the scrobble sync
//!
//! # Example
//!
//! ```rust,no_run
//! use greenroom_storage::{create_pool, run_migrations, SqlitePendingQueue};
//! use greenroom_core::PendingPlayQueue;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://greenroom.db").await?;
//! run_migrations(&pool).await?;
//!
//! let queue = SqlitePendingQueue::new(pool);
//! println!("{} plays waiting", queue.count().await?);
//! # Ok(())
//! # }
//! ```

mod error;

// Vertical slices
pub mod pending_plays;
pub mod session;
pub mod settings;

pub use error::StorageError;
pub use pending_plays::SqlitePendingQueue;
pub use session::StoredSession;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://greenroom.db>`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    debug!(url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}
