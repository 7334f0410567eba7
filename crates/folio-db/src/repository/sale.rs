//! # Sale Repository
//!
//! Database operations for in-person sales.
//!
//! ## Immutability
//! A sale row is written once and never updated. Price and quantity are
//! snapshots taken at the moment of sale, so later catalog edits cannot
//! rewrite history. The stock side effect is the caller's second step: the
//! engine records the sale, then pushes the decrement through the ledger.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use folio_core::Sale;

/// Persistence for in-person sale records.
///
/// ## Usage
/// ```rust,ignore
/// let repo = SaleRepository::new(pool);
///
/// repo.insert(&sale).await?;
/// let all = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Wraps a pool handle.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a sale record.
    pub async fn insert(&self, sale: &Sale) -> DbResult<Sale> {
        debug!(
            book_id = %sale.book_id,
            user_id = %sale.user_id,
            quantity = sale.quantity,
            "Inserting sale"
        );

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, book_id, user_id, quantity,
                unit_price_cents, total_price_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.book_id)
        .bind(&sale.user_id)
        .bind(sale.quantity)
        .bind(sale.unit_price_cents)
        .bind(sale.total_price_cents)
        .bind(sale.created_at)
        .execute(&self.pool)
        .await?;

        Ok(sale.clone())
    }

    /// Lists every sale, newest first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, book_id, user_id, quantity,
                   unit_price_cents, total_price_cents, created_at
            FROM sales
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists one seller's sales, newest first.
    pub async fn list_by_user(&self, user_id: &str) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, book_id, user_id, quantity,
                   unit_price_cents, total_price_cents, created_at
            FROM sales
            WHERE user_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Counts sale records (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new sale ID.
pub fn generate_sale_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
