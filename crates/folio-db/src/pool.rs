//! # Database Pool Management
//!
//! One `SqlitePool` behind a cloneable [`Database`] handle. The pool is
//! built from a [`DbConfig`], migrations run on connect unless disabled,
//! and repositories are handed out as cheap per-call views over the pool.
//!
//! ## SQLite Setup
//! Every connection opens with:
//! - WAL journal, so catalog reads keep flowing while a reservation writes
//! - `synchronous = NORMAL`, the durability level WAL is designed around
//! - Foreign keys ON (SQLite ships with them off)

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::book::BookRepository;
use crate::repository::reservation::ReservationRepository;
use crate::repository::sale::SaleRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Pool settings, built with the consuming-builder style.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("./data/folio.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Where the SQLite file lives. Created on first connect.
    pub database_path: PathBuf,

    /// Pool ceiling. Five covers a single-store counter comfortably.
    pub max_connections: u32,

    /// Connections kept warm between requests. Default: 1.
    pub min_connections: u32,

    /// How long an acquire may wait before giving up. Default: 30s.
    pub connect_timeout: Duration,

    /// Idle time before a pooled connection is dropped. Default: 10 minutes.
    pub idle_timeout: Duration,

    /// Apply pending migrations during [`Database::new`]. Default: true.
    pub run_migrations: bool,
}

impl DbConfig {
    /// Builds a configuration for the database file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the pool ceiling.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets how many connections stay open while idle.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the acquire timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Enables or disables migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Configuration for an isolated in-memory database.
    ///
    /// Every test gets its own schema and rows; nothing touches disk.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            // A second connection would see a different empty database
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    /// Translates this config into sqlx connect options.
    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        // mode=rwc creates the file on first open
        let url = format!("sqlite://{}?mode=rwc", self.database_path.display());

        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // Off by default in SQLite; the schema depends on them
            .foreign_keys(true)
            .create_if_missing(true);

        Ok(options)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Cloneable handle over the pool; repositories are minted per call.
///
/// ## Design: One Handle, Many Repositories
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Engine State Management                                                │
/// │                                                                         │
/// │  The engine owns one Database and hands out cheap repository views:    │
/// │                                                                         │
/// │  db.books()         ← Catalog rows + stock CAS writes                  │
/// │  db.reservations()  ← Headers, items, status guard, number sequence    │
/// │  db.sales()         ← Immutable sale records                           │
/// │                                                                         │
/// │  Benefits:                                                              │
/// │  • Operations only get the repository they need                        │
/// │  • Pool is shared, clones are cheap (Arc inside SqlitePool)            │
/// │  • Easier testing (in-memory Database per test)                        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./folio.db")).await?;
/// let books = db.books().list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool described by `config`.
    ///
    /// The file is created when missing, the WAL/foreign-key pragmas are
    /// applied per connection, and pending migrations run unless the
    /// config turned them off.
    ///
    /// ## Errors
    /// [`DbError::ConnectionFailed`] when the pool cannot be built,
    /// [`DbError::MigrationFailed`] when a migration fails to apply.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_options = config.connect_options()?;
        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations.
    ///
    /// Called from [`Database::new`] by default; call it yourself only
    /// when the config disabled migrations on connect.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// The raw pool, for callers that run their own SQL.
    ///
    /// For one-off queries the repositories do not cover; prefer the
    /// repository methods when one exists.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the book repository.
    pub fn books(&self) -> BookRepository {
        BookRepository::new(self.pool.clone())
    }

    /// Returns the reservation repository.
    pub fn reservations(&self) -> ReservationRepository {
        ReservationRepository::new(self.pool.clone())
    }

    /// A [`SaleRepository`] over this pool.
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    /// Closes the pool. Repository calls fail after this.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Returns whether the database still answers queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_answers_queries() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_migrations_seed_the_sequence_row() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let value: i64 =
            sqlx::query_scalar("SELECT value FROM sequences WHERE name = 'reservation_number'")
                .fetch_one(db.pool())
                .await
                .unwrap();

        assert_eq!(value, 0);
    }

    #[tokio::test]
    async fn test_config_builder_keeps_overrides() {
        let config = DbConfig::new("/tmp/folio_test.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
    }
}
