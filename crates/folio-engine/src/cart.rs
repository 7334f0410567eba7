//! # Cart Store and Cart Operations
//!
//! The shared cart and the engine operations that act on it.
//!
//! ## Thread Safety
//! The cart lives in an `Arc<Mutex<Cart>>`. UI hosts call the engine
//! from concurrent tasks, and a cart mutation must see the whole cart
//! or none of it, so every access goes through the store's closures.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Caller Action            Engine Operation         Cart Change          │
//! │  ─────────────            ────────────────         ───────────          │
//! │                                                                         │
//! │  Pick a title ──────────► add_to_cart() ─────────► merge or new line   │
//! │                                                                         │
//! │  Change quantity ───────► update_cart_line() ────► line.quantity = n   │
//! │                                                                         │
//! │  Remove a title ────────► remove_from_cart() ────► line dropped        │
//! │                                                                         │
//! │  Start over ────────────► clear_cart() ──────────► lines.clear()       │
//! │                                                                         │
//! │  View cart ─────────────► get_cart() ────────────► (read only)         │
//! │                                                                         │
//! │  NOTE: A clamped line STAYS in the cart. The StockExceeded error is    │
//! │        the signal to surface; the next get_cart shows the clamped      │
//! │        quantity. This is the soft phase of the two-phase stock check.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::debug;

use folio_core::cart::{Cart, CartLine};

use crate::error::{EngineError, EngineResult};
use crate::Engine;

// =============================================================================
// Cart Store
// =============================================================================

/// The engine-owned cart state.
///
/// A plain `Mutex`, not a `RwLock`: cart operations are quick and most
/// of them write, so reader/writer splitting buys nothing here.
#[derive(Debug)]
pub struct CartStore {
    cart: Arc<Mutex<Cart>>,
}

impl CartStore {
    /// Creates a new empty cart store.
    pub fn new() -> Self {
        CartStore {
            cart: Arc::new(Mutex::new(Cart::new())),
        }
    }

    /// Runs `f` against the cart under the lock, read-only.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Runs `f` against the cart under the lock, with mutation.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_store.with_cart_mut(|cart| cart.add(&book, 1))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&mut cart)
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Cart DTOs
// =============================================================================

/// Cart totals summary for engine responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub item_count: i64,
    pub total_cents: i64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            item_count: cart.item_count(),
            total_cents: cart.total_cents(),
        }
    }
}

/// Cart response including lines and totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        CartView {
            lines: cart.lines.clone(),
            totals: CartTotals::from(cart),
        }
    }
}

// =============================================================================
// Cart Operations
// =============================================================================

impl Engine {
    /// Returns the cart as lines plus totals.
    pub fn get_cart(&self) -> CartView {
        debug!("get_cart");
        self.cart.with_cart(|c| CartView::from(c))
    }

    /// Adds a book to the cart.
    ///
    /// ## Behavior
    /// - Book already in cart: quantity increases, stock snapshot refreshes
    /// - Book not in cart: added as a new line with the price frozen
    /// - Quantity beyond the known stock: the line is clamped and
    ///   [`EngineError::StockExceeded`] is returned as the signal; the
    ///   clamped line stays in the cart
    ///
    /// ## Arguments
    /// * `book_id` - Book UUID to add
    /// * `quantity` - Copies to add (default: 1)
    ///
    /// ## Returns
    /// Updated cart with all lines and totals
    pub async fn add_to_cart(
        &self,
        book_id: &str,
        quantity: Option<i64>,
    ) -> EngineResult<CartView> {
        let quantity = quantity.unwrap_or(1);
        debug!(book_id = %book_id, quantity = %quantity, "add_to_cart");

        // Fetch the row first; the cart freezes price and stock from it
        let book = self
            .db
            .books()
            .get_by_id(book_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Book", book_id))?;

        if !book.is_active {
            return Err(EngineError::validation(
                "Book is not available for reservation",
            ));
        }

        self.cart.with_cart_mut(|c| {
            c.add(&book, quantity)?;
            Ok(CartView::from(&*c))
        })
    }

    /// Sets the quantity of a cart line directly.
    ///
    /// ## Behavior
    /// - Quantity 0: removes the line
    /// - Quantity above current stock: clamps and signals, like add
    /// - Book not in cart: validation error
    ///
    /// ## Arguments
    /// * `book_id` - Book UUID in the cart
    /// * `quantity` - New quantity (0 to remove)
    pub async fn update_cart_line(&self, book_id: &str, quantity: i64) -> EngineResult<CartView> {
        debug!(book_id = %book_id, quantity = %quantity, "update_cart_line");

        // Refresh the stock snapshot when the catalog still knows the book,
        // so the clamp compares against current numbers
        if let Some(book) = self.db.books().get_by_id(book_id).await? {
            self.cart.with_cart_mut(|c| c.refresh_known_stock(&book));
        }

        self.cart.with_cart_mut(|c| {
            c.set_quantity(book_id, quantity)?;
            Ok(CartView::from(&*c))
        })
    }

    /// Removes a line from the cart.
    pub fn remove_from_cart(&self, book_id: &str) -> EngineResult<CartView> {
        debug!(book_id = %book_id, "remove_from_cart");

        self.cart.with_cart_mut(|c| {
            c.remove(book_id)?;
            Ok(CartView::from(&*c))
        })
    }

    /// Clears all lines from the cart.
    ///
    /// ## When Used
    /// - Customer abandons the pick list
    /// - After a reservation is created from the cart
    pub fn clear_cart(&self) -> CartView {
        debug!("clear_cart");

        self.cart.with_cart_mut(|c| {
            c.clear();
            CartView::from(&*c)
        })
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
    async fn test_add_to_cart_freezes_price() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2500, 10).await;

        let view = engine.add_to_cart("b-1", Some(2)).await.unwrap();

        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].unit_price_cents, 2500);
        assert_eq!(view.totals.item_count, 2);
        assert_eq!(view.totals.total_cents, 5000);
    }

    #[tokio::test]
    async fn test_add_unknown_book() {
        let engine = test_engine().await;

        let err = engine.add_to_cart("missing", None).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_add_inactive_book_rejected() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2500, 10).await;

        let mut retired = engine.db.books().get_by_id("b-1").await.unwrap().unwrap();
        retired.is_active = false;
        engine.db.books().update(&retired).await.unwrap();

        let err = engine.add_to_cart("b-1", None).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert!(engine.get_cart().lines.is_empty());
    }

    #[tokio::test]
    async fn test_add_clamps_and_keeps_line() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2500, 3).await;

        let err = engine.add_to_cart("b-1", Some(5)).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::StockExceeded { available: 3, .. }
        ));

        // The clamped line survived the error
        let view = engine.get_cart();
        assert_eq!(view.lines[0].quantity, 3);
        assert_eq!(view.totals.total_cents, 7500);
    }

    #[tokio::test]
    async fn test_update_cart_line_refreshes_stock() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2000, 5).await;

        engine.add_to_cart("b-1", Some(2)).await.unwrap();

        // Stock moves underneath the cart
        engine.db.books().decrement_stock("b-1", 4).await.unwrap();

        let err = engine.update_cart_line("b-1", 5).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::StockExceeded { available: 1, .. }
        ));
        assert_eq!(engine.get_cart().lines[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_update_to_zero_removes_line() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2000, 5).await;

        engine.add_to_cart("b-1", Some(2)).await.unwrap();
        let view = engine.update_cart_line("b-1", 0).await.unwrap();

        assert!(view.lines.is_empty());
        assert_eq!(view.totals.total_cents, 0);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2000, 5).await;
        seed_book(&engine, "b-2", 3000, 5).await;

        engine.add_to_cart("b-1", None).await.unwrap();
        engine.add_to_cart("b-2", None).await.unwrap();

        let view = engine.remove_from_cart("b-1").unwrap();
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].book_id, "b-2");

        let err = engine.remove_from_cart("b-1").unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        let view = engine.clear_cart();
        assert!(view.lines.is_empty());
    }
}
