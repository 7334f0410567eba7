//! # Domain Types
//!
//! Core domain types used throughout Folio.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Book       │   │   Reservation   │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  title, author  │   │  reservation_   │   │  book_id (FK)   │       │
//! │  │  price_cents    │   │    number       │   │  quantity       │       │
//! │  │  stock, version │   │  status, total  │   │  unit_price     │       │
//! │  └─────────────────┘   └────────┬────────┘   └─────────────────┘       │
//! │                                 │ 1-N                                   │
//! │                        ┌────────┴────────┐   ┌─────────────────┐       │
//! │                        │ ReservationItem │   │ReservationStatus│       │
//! │                        │  ─────────────  │   │  ─────────────  │       │
//! │                        │  title_snapshot │   │  Pending        │       │
//! │                        │  unit_price     │   │  Confirmed      │       │
//! │                        │  (frozen)       │   │  Completed      │       │
//! │                        └─────────────────┘   │  Cancelled      │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Rows relate through immutable UUID strings in `id`. Where a human
//! needs a handle, there is a second key: `reservation_number` is the
//! short sequential number staff read out at pickup, never the UUID.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::payment::PaymentMethod;

// =============================================================================
// Book
// =============================================================================

/// A book in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Book {
    /// UUID primary key.
    pub id: String,

    /// Title shown in the catalog and frozen onto reservation items.
    pub title: String,

    /// Author name.
    pub author: String,

    /// Price in centavos (smallest currency unit).
    pub price_cents: i64,

    /// Current stock level. Never negative.
    pub stock: i64,

    /// Category label ("Clássicos", "Romantismo", ...).
    pub category: String,

    /// Optional description for the detail view.
    pub description: Option<String>,

    /// Optional cover image URL.
    pub cover_url: Option<String>,

    /// Whether the book is active (soft delete).
    pub is_active: bool,

    /// When the book was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the book was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    /// Optimistic-concurrency counter, incremented by every mutation.
    /// Stock writes compare-and-swap on this value.
    pub version: i64,
}

impl Book {
    /// The list price as [`Money`].
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks if at least one copy is in stock.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Checks if the current stock covers the requested quantity.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Reservation Status
// =============================================================================

/// The lifecycle status of a reservation.
///
/// Transition rules live in [`crate::workflow`]; this is the storage shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Created, waiting for staff attention.
    Pending,
    /// Payment arranged, waiting for pickup.
    Confirmed,
    /// Books handed over. Terminal.
    Completed,
    /// Abandoned or rejected. Terminal.
    Cancelled,
}

impl ReservationStatus {
    /// Returns the lowercase storage/display form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for ReservationStatus {
    fn default() -> Self {
        ReservationStatus::Pending
    }
}

// =============================================================================
// Staff Role
// =============================================================================

/// The binary staff distinction the reservation list scope needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Sees and manages everything.
    Admin,
    /// Sees own reservations plus the shared pending queue.
    Seller,
}

// =============================================================================
// Reservation
// =============================================================================

/// A reservation header: one customer's claim on a set of books.
///
/// `payment_method` is stored as its display label ("Numerário", "M-Pesa",
/// "e-Mola", "POS"); the typed [`PaymentMethod`] union is validated at the
/// builder boundary and collapses to the label for persistence.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Reservation {
    pub id: String,
    /// Human-facing sequential number, unique and increasing.
    pub reservation_number: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_alternative_phone: Option<String>,
    pub customer_email: Option<String>,
    pub pickup_location: Option<String>,
    /// Payment method label.
    pub payment_method: String,
    pub notes: Option<String>,
    /// Authoritative total, equal to the sum of the item totals.
    pub total_amount_cents: i64,
    pub status: ReservationStatus,
    /// Staff member who registered the reservation, when known.
    pub user_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

// =============================================================================
// Reservation Item
// =============================================================================

/// A line item in a reservation.
/// Uses snapshot pattern to freeze book data at reservation time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ReservationItem {
    pub id: String,
    pub reservation_id: String,
    pub book_id: String,
    /// Title at reservation time (frozen).
    pub title_snapshot: String,
    /// Quantity reserved.
    pub quantity: i64,
    /// Unit price in centavos at reservation time (frozen).
    pub unit_price_cents: i64,
    /// Line total (unit_price × quantity).
    pub total_price_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl ReservationItem {
    /// The per-copy price frozen at reservation time, as [`Money`].
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// The stored line total as [`Money`].
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// An immediate in-person sale of a single title.
/// Immutable once written; recording one decrements the stock ledger.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub book_id: String,
    /// Staff member who rang the sale up.
    pub user_id: String,
    pub quantity: i64,
    /// Unit price in centavos at sale time (frozen).
    pub unit_price_cents: i64,
    /// Total (unit_price × quantity).
    pub total_price_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// The per-copy price charged, as [`Money`].
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

// =============================================================================
// Reservation Input Types
// =============================================================================

/// One requested line of a reservation: which book, how many copies.
/// Prices are deliberately absent; the builder re-fetches them.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLine {
    pub book_id: String,
    pub quantity: i64,
}

/// Contact details captured at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub alternative_phone: Option<String>,
    pub email: Option<String>,
    pub pickup_location: Option<String>,
}

/// Everything the reservation builder needs to create a reservation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReservationDraft {
    pub customer: CustomerDetails,
    pub payment: PaymentMethod,
    pub notes: Option<String>,
    /// Staff member registering the reservation, when known.
    pub user_id: Option<String>,
    pub lines: Vec<OrderLine>,
}

// =============================================================================
// Unit Tests
// =============================================================================
