//! # Stock Ledger and Walk-In Sales
//!
//! Stock only ever moves DOWN through these operations, and the ledger
//! clamps at zero instead of failing. Overselling at the counter is a fact
//! of a physical store (the copy is already in the customer's hand); the
//! numbers follow reality, not the other way round.
//!
//! ## Sale vs Reservation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  record_sale          the copy LEFT the store  ──► decrement now        │
//! │                                                                         │
//! │  create_reservation   the copy is only CLAIMED ──► no stock change      │
//! │                       (decrement happens at completion, reservation.rs) │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, error, info};

use folio_core::query::QueryScope;
use folio_core::stats::SalesSummary;
use folio_core::types::Sale;
use folio_core::validation::validate_quantity;
use folio_db::repository::sale::generate_sale_id;

use crate::error::{EngineError, EngineResult};
use crate::Engine;

impl Engine {
    /// Decrements a book's stock through the ledger.
    ///
    /// ## Behavior
    /// The write clamps at zero: decrementing 5 from a stock of 2 leaves 0.
    /// Concurrent writers are serialized by the version compare-and-swap
    /// underneath; a caller that keeps losing the race gets
    /// [`EngineError::Conflict`].
    ///
    /// ## Returns
    /// The stock level after the write.
    pub async fn decrement_stock(&self, book_id: &str, quantity: i64) -> EngineResult<i64> {
        validate_quantity(quantity)?;
        debug!(book_id = %book_id, quantity = %quantity, "decrement_stock");

        Ok(self.db.books().decrement_stock(book_id, quantity).await?)
    }

    /// Records a walk-in sale of a single title.
    ///
    /// ## Behavior
    /// The sale row is written first with price and quantity frozen, then
    /// the stock decrements. The decrement clamps at zero, so a sale never
    /// fails for lack of stock; a decrement failure is surfaced but the
    /// sale row stays (the money changed hands either way).
    ///
    /// ## Arguments
    /// * `book_id` - Title sold
    /// * `quantity` - Copies handed over
    /// * `user_id` - Staff member ringing the sale up
    pub async fn record_sale(
        &self,
        book_id: &str,
        quantity: i64,
        user_id: &str,
    ) -> EngineResult<Sale> {
        validate_quantity(quantity)?;
        if user_id.trim().is_empty() {
            return Err(EngineError::validation("user_id is required"));
        }
        debug!(book_id = %book_id, quantity = %quantity, user_id = %user_id, "record_sale");

        let book = self
            .db
            .books()
            .get_by_id(book_id)
            .await?
            .filter(|b| b.is_active)
            .ok_or_else(|| EngineError::not_found("Book", book_id))?;

        let sale = Sale {
            id: generate_sale_id(),
            book_id: book.id.clone(),
            user_id: user_id.to_string(),
            quantity,
            unit_price_cents: book.price_cents,
            total_price_cents: book.price_cents * quantity,
            created_at: Utc::now(),
        };

        self.db.sales().insert(&sale).await?;

        if let Err(err) = self.db.books().decrement_stock(book_id, quantity).await {
            error!(
                sale_id = %sale.id,
                book_id = %book_id,
                %err,
                "Stock decrement failed after sale insert"
            );
            return Err(err.into());
        }

        info!(
            sale_id = %sale.id,
            book_id = %book_id,
            quantity = %quantity,
            total = %sale.total_price_cents,
            "Sale recorded"
        );

        Ok(sale)
    }

    /// Computes the sales summary for a dashboard.
    ///
    /// ## Scope
    /// [`QueryScope::All`] aggregates the whole store;
    /// [`QueryScope::Own`] strictly one seller's sales.
    pub async fn sales_summary(&self, scope: QueryScope) -> EngineResult<SalesSummary> {
        debug!(?scope, "sales_summary");

        let sales = self.db.sales().list().await?;
        // Retired books still categorize their past sales
        let books = self.db.books().list_all().await?;

        Ok(SalesSummary::compute(&sales, &books, &scope))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use folio_core::types::Book;
    use folio_db::{Database, DbConfig};

    use crate::EngineConfig;

    async fn test_engine() -> Engine {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        Engine::new(db, EngineConfig::default())
    }

    async fn seed_book(engine: &Engine, id: &str, price_cents: i64, stock: i64) {
        let now = Utc::now();
        let book = Book {
            id: id.to_string(),
            title: format!("Book {}", id),
            author: "Autor".to_string(),
            price_cents,
            stock,
            category: "Clássicos".to_string(),
            description: None,
            cover_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            version: 0,
        };
        engine.db.books().insert(&book).await.unwrap();
    }

    #[tokio::test]
    async fn test_record_sale_freezes_price_and_decrements() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2600, 5).await;

        let sale = engine.record_sale("b-1", 3, "u1").await.unwrap();

        assert_eq!(sale.unit_price_cents, 2600);
        assert_eq!(sale.total_price_cents, 7800);

        let book = engine.get_book("b-1").await.unwrap();
        assert_eq!(book.stock, 2);
    }

    #[tokio::test]
    async fn test_record_sale_clamps_stock_at_zero() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2600, 2).await;

        // Selling more copies than the ledger thinks exist still succeeds
        let sale = engine.record_sale("b-1", 5, "u1").await.unwrap();
        assert_eq!(sale.quantity, 5);
        assert_eq!(sale.total_price_cents, 13_000);

        let book = engine.get_book("b-1").await.unwrap();
        assert_eq!(book.stock, 0);
    }

    #[tokio::test]
    async fn test_record_sale_rejects_bad_input() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2600, 5).await;

        let err = engine.record_sale("b-1", 0, "u1").await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        let err = engine.record_sale("b-1", 1, "  ").await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        let err = engine.record_sale("missing", 1, "u1").await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));

        // Nothing was written along the rejected paths
        assert_eq!(engine.db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_decrement_stock_validates_quantity() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2600, 5).await;

        let err = engine.decrement_stock("b-1", -2).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        let remaining = engine.decrement_stock("b-1", 2).await.unwrap();
        assert_eq!(remaining, 3);
    }

    #[tokio::test]
    async fn test_sales_summary_scoped_to_seller() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2000, 20).await;
        seed_book(&engine, "b-2", 3000, 20).await;

        engine.record_sale("b-1", 2, "u1").await.unwrap();
        engine.record_sale("b-2", 1, "u1").await.unwrap();
        engine.record_sale("b-1", 4, "u2").await.unwrap();

        let all = engine.sales_summary(QueryScope::All).await.unwrap();
        assert_eq!(all.total_units, 7);
        assert_eq!(all.total_revenue_cents, 2000 * 6 + 3000);

        let own = engine
            .sales_summary(QueryScope::Own {
                user_id: "u1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(own.total_units, 3);
        assert_eq!(own.total_revenue_cents, 7000);
        assert!(!own.units_by_user.contains_key("u2"));
    }
}
