//! # Cart Aggregation
//!
//! Pure cart math: one customer's pick list before it becomes a reservation.
//!
//! ## Cart Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Invariants                                 │
//! │                                                                         │
//! │  • Lines are unique by book_id (adding again merges quantities)        │
//! │  • Every line has quantity >= 1 (setting 0 removes the line)           │
//! │  • Quantities are clamped to the stock known at add time               │
//! │  • Totals are derived from the lines on every call, never cached       │
//! │  • Insertion order is kept for display                                 │
//! │                                                                         │
//! │  The clamp here is the SOFT phase: it keeps the cart sensible while    │
//! │  the customer browses. The authoritative stock check happens when the  │
//! │  reservation is created, against freshly fetched rows.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Book, OrderLine};
use crate::validation::validate_quantity;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// One title in the cart.
///
/// ## Design Notes
/// - `title` and `unit_price_cents` are frozen at add time so the cart
///   displays consistent data even if the catalog row changes underneath
/// - `known_stock` is the stock level seen when the line was last touched;
///   it drives the soft clamp and nothing else
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Book ID (UUID)
    pub book_id: String,

    /// Title at time of adding (frozen)
    pub title: String,

    /// Price in centavos at time of adding (frozen)
    pub unit_price_cents: i64,

    /// Stock level seen when the line was last touched
    pub known_stock: i64,

    /// Quantity in cart, always >= 1
    pub quantity: i64,

    /// When this line was added to the cart
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a new cart line from a book and quantity.
    ///
    /// ## Price Freezing
    /// The price is captured at this moment. If the book price changes in
    /// the catalog, this line retains the original price until checkout,
    /// where the builder reprices everything from fresh rows anyway.
    pub fn from_book(book: &Book, quantity: i64) -> Self {
        CartLine {
            book_id: book.id.clone(),
            title: book.title.clone(),
            unit_price_cents: book.price_cents,
            known_stock: book.stock,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// The line total, unit price times quantity.
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }

    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cart: an ordered set of lines, unique per book.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in the cart, in insertion order
    pub lines: Vec<CartLine>,

    /// Stamped at creation and again on clear
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// An empty cart stamped with the current time.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds a book to the cart or merges into the existing line.
    ///
    /// ## Behavior
    /// - Book already in cart: quantities are summed, `known_stock` is
    ///   refreshed from the row passed in
    /// - New book: a line is appended
    /// - Either way the resulting quantity is clamped to `known_stock`;
    ///   when a clamp happened the cart KEEPS the clamped line and this
    ///   returns [`CoreError::StockExceeded`] as the signal to surface.
    ///   A title with no stock left never gets a line.
    pub fn add(&mut self, book: &Book, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        // Merge into an existing line
        if let Some(idx) = self.lines.iter().position(|l| l.book_id == book.id) {
            self.lines[idx].known_stock = book.stock;

            let desired = self.lines[idx].quantity + quantity;
            if desired > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: desired,
                    max: MAX_LINE_QUANTITY,
                });
            }

            if desired > book.stock {
                // Clamp; a sold-out title drops off the cart entirely
                if book.stock == 0 {
                    self.lines.remove(idx);
                } else {
                    self.lines[idx].quantity = book.stock;
                }
                return Err(CoreError::StockExceeded {
                    book_id: book.id.clone(),
                    available: book.stock,
                });
            }

            self.lines[idx].quantity = desired;
            return Ok(());
        }

        // New line
        if book.stock == 0 {
            return Err(CoreError::StockExceeded {
                book_id: book.id.clone(),
                available: 0,
            });
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        if quantity > book.stock {
            self.lines.push(CartLine::from_book(book, book.stock));
            return Err(CoreError::StockExceeded {
                book_id: book.id.clone(),
                available: book.stock,
            });
        }

        self.lines.push(CartLine::from_book(book, quantity));
        Ok(())
    }

    /// Sets the quantity of a line directly.
    ///
    /// ## Behavior
    /// - Quantity <= 0 removes the line
    /// - Quantity above `known_stock` clamps and signals, like [`Cart::add`]
    /// - Unknown book returns [`CoreError::NotInCart`]
    pub fn set_quantity(&mut self, book_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return self.remove(book_id);
        }

        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        let idx = self
            .lines
            .iter()
            .position(|l| l.book_id == book_id)
            .ok_or_else(|| CoreError::NotInCart(book_id.to_string()))?;

        let known_stock = self.lines[idx].known_stock;
        if quantity > known_stock {
            if known_stock == 0 {
                self.lines.remove(idx);
            } else {
                self.lines[idx].quantity = known_stock;
            }
            return Err(CoreError::StockExceeded {
                book_id: book_id.to_string(),
                available: known_stock,
            });
        }

        self.lines[idx].quantity = quantity;
        Ok(())
    }

    /// Refreshes a line's stock snapshot from a freshly fetched row.
    /// No-op when the book is not in the cart.
    pub fn refresh_known_stock(&mut self, book: &Book) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.book_id == book.id) {
            line.known_stock = book.stock;
        }
    }

    /// Removes a line from the cart by book ID.
    pub fn remove(&mut self, book_id: &str) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.book_id != book_id);

        if self.lines.len() == initial_len {
            Err(CoreError::NotInCart(book_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    /// Returns the number of distinct lines in the cart.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Calculates the cart total in centavos. Derived, never cached.
    pub fn total_cents(&self) -> i64 {
        self.lines.iter().map(|l| l.line_total_cents()).sum()
    }

    /// Returns the cart total as Money.
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents())
    }

    /// True when no lines remain.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the order lines to submit to the reservation builder.
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.lines
            .iter()
            .map(|l| OrderLine {
                book_id: l.book_id.clone(),
                quantity: l.quantity,
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_book(id: &str, price_cents: i64, stock: i64) -> Book {
        Book {
            id: id.to_string(),
            title: format!("Book {}", id),
            author: "Autor".to_string(),
            price_cents,
            stock,
            category: "Clássicos".to_string(),
            description: None,
            cover_url: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            version: 0,
        }
    }

    #[test]
    fn test_cart_add_line() {
        let mut cart = Cart::new();
        let book = test_book("1", 2500, 10);

        cart.add(&book, 2).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_cents(), 5000);
    }

    #[test]
    fn test_cart_add_same_book_merges_quantity() {
        let mut cart = Cart::new();
        let book = test_book("1", 2500, 10);

        cart.add(&book, 2).unwrap();
        cart.add(&book, 3).unwrap();

        assert_eq!(cart.line_count(), 1); // Still one line
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_cart_add_clamps_to_known_stock() {
        let mut cart = Cart::new();
        let book = test_book("1", 2500, 3);

        let err = cart.add(&book, 5).unwrap_err();
        assert!(matches!(
            err,
            CoreError::StockExceeded { available: 3, .. }
        ));

        // The clamped line is kept and the cart stays usable
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines[0].quantity, 3);
        assert_eq!(cart.total_cents(), 7500);
    }

    #[test]
    fn test_cart_add_merge_clamps() {
        let mut cart = Cart::new();
        let book = test_book("1", 2500, 4);

        cart.add(&book, 3).unwrap();
        let err = cart.add(&book, 3).unwrap_err();
        assert!(matches!(
            err,
            CoreError::StockExceeded { available: 4, .. }
        ));
        assert_eq!(cart.lines[0].quantity, 4);
    }

    #[test]
    fn test_cart_add_sold_out_title() {
        let mut cart = Cart::new();
        let book = test_book("1", 2500, 0);

        let err = cart.add(&book, 1).unwrap_err();
        assert!(matches!(
            err,
            CoreError::StockExceeded { available: 0, .. }
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_set_quantity() {
        let mut cart = Cart::new();
        let book = test_book("1", 2500, 10);

        cart.add(&book, 2).unwrap();
        cart.set_quantity("1", 7).unwrap();

        assert_eq!(cart.item_count(), 7);
        assert_eq!(cart.total_cents(), 17_500);
    }

    #[test]
    fn test_cart_set_quantity_zero_removes() {
        let mut cart = Cart::new();
        let book = test_book("1", 2500, 10);

        cart.add(&book, 2).unwrap();
        cart.set_quantity("1", 0).unwrap();

        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_set_quantity_clamps() {
        let mut cart = Cart::new();
        let book = test_book("1", 2500, 3);

        cart.add(&book, 2).unwrap();
        let err = cart.set_quantity("1", 9).unwrap_err();
        assert!(matches!(
            err,
            CoreError::StockExceeded { available: 3, .. }
        ));
        assert_eq!(cart.lines[0].quantity, 3);
    }

    #[test]
    fn test_cart_unknown_book_errors() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.set_quantity("missing", 2),
            Err(CoreError::NotInCart(_))
        ));
        assert!(matches!(
            cart.remove("missing"),
            Err(CoreError::NotInCart(_))
        ));
    }

    #[test]
    fn test_cart_price_frozen_on_merge() {
        let mut cart = Cart::new();
        let book = test_book("1", 2500, 10);
        cart.add(&book, 1).unwrap();

        // Catalog price changes; stock snapshot refreshes, price does not
        let mut updated = test_book("1", 3000, 6);
        updated.title = "Renamed".to_string();
        cart.add(&updated, 1).unwrap();

        assert_eq!(cart.lines[0].unit_price_cents, 2500);
        assert_eq!(cart.lines[0].title, "Book 1");
        assert_eq!(cart.lines[0].known_stock, 6);
    }

    #[test]
    fn test_cart_clear() {
        let mut cart = Cart::new();
        let book = test_book("1", 2500, 10);

        cart.add(&book, 2).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_cents(), 0);
    }

    #[test]
    fn test_cart_max_lines() {
        let mut cart = Cart::new();
        for i in 0..MAX_CART_LINES {
            let book = test_book(&format!("b-{}", i), 1000, 5);
            cart.add(&book, 1).unwrap();
        }

        let overflow = test_book("overflow", 1000, 5);
        assert!(matches!(
            cart.add(&overflow, 1),
            Err(CoreError::CartTooLarge { .. })
        ));
    }

    #[test]
    fn test_cart_order_lines() {
        let mut cart = Cart::new();
        cart.add(&test_book("1", 2500, 10), 2).unwrap();
        cart.add(&test_book("2", 2000, 10), 1).unwrap();

        let lines = cart.order_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].book_id, "1");
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[1].book_id, "2");
        assert_eq!(lines[1].quantity, 1);
    }
}
