//! # Database Migrations
//!
//! Schema changes ship as SQL files under `migrations/sqlite/`, embedded
//! into the binary at compile time by [`sqlx::migrate!`]. On startup the
//! migrator compares the embedded set against the `_sqlx_migrations`
//! table and applies whatever is missing, in filename order, each inside
//! its own transaction.
//!
//! ## Adding a Migration
//! 1. Add `NNN_description.sql` under `migrations/sqlite/` with the next number
//! 2. Keep the SQL idempotent where possible (`IF NOT EXISTS`)
//! 3. Never edit an applied migration; checksums are recorded and verified

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

/// All migrations under `migrations/sqlite`, embedded at compile time.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every migration not yet recorded in `_sqlx_migrations`.
///
/// Safe to call on every startup; an up-to-date database is a no-op.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied");
    Ok(())
}

/// Counts embedded vs applied migrations, for startup diagnostics.
///
/// Returns `(embedded, applied)`. A fresh database that has never run the
/// migrator has no `_sqlx_migrations` table; that reads as zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((embedded, applied as usize))
}
