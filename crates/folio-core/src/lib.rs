//! # folio-core: Pure Business Logic for Folio
//!
//! The heart of Folio, the reservation and inventory engine behind the
//! bookstore. Everything in this crate is a pure function or a plain
//! value type: no database, no clock beyond what callers pass in, no
//! I/O of any kind. That is what makes the clamp rules, the status
//! graph, and the money arithmetic testable without a test harness.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Folio Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (TypeScript)                        │   │
//! │  │    Catalog UI ──► Cart UI ──► Checkout UI ──► Staff Lists      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    folio-engine (facade)                        │   │
//! │  │    add_to_cart, create_reservation, record_sale, etc.          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ folio-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐         │   │
//! │  │   │  types   │ │  money   │ │   cart   │ │ workflow │         │   │
//! │  │   │   Book   │ │  Money   │ │   Cart   │ │  status  │         │   │
//! │  │   │ Reserv.  │ │ centavos │ │ CartLine │ │  graph   │         │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘         │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐                      │   │
//! │  │   │  query   │ │ payment  │ │  stats   │                      │   │
//! │  │   │  filter  │ │  union   │ │ summary  │                      │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘                      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    folio-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Book, Reservation, Sale, etc.)
//! - [`money`] - Centavo amounts with integer arithmetic
//! - [`cart`] - Cart aggregation with merge and soft-clamp rules
//! - [`payment`] - Payment method tagged union with boundary validation
//! - [`workflow`] - Reservation status transition rules
//! - [`query`] - Pure reservation list filtering
//! - [`stats`] - Sales aggregation for dashboards
//! - [`error`] - CoreError and ValidationError
//! - [`validation`] - Boundary checks for human input
//!
//! ## Ground Rules
//!
//! 1. **Deterministic**: same input, same output, every time
//! 2. **No I/O**: anything touching the database lives in folio-db
//! 3. **Integer Money**: amounts are centavos in an `i64`, never floats
//! 4. **Typed Errors**: failures are enum variants, not strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use folio_core::money::Money;
//! use folio_core::types::ReservationStatus;
//!
//! // Create money from centavos (never from floats!)
//! let price = Money::from_cents(2500); // 25.00 MT
//! let line_total = price.multiply_quantity(3);
//! assert_eq!(line_total.cents(), 7500);
//!
//! // Status transitions are checked, not assumed
//! assert!(ReservationStatus::Pending.can_transition_to(ReservationStatus::Completed));
//! assert!(!ReservationStatus::Completed.can_transition_to(ReservationStatus::Pending));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod payment;
pub mod query;
pub mod stats;
pub mod types;
pub mod validation;
pub mod workflow;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// The everyday names, importable without the module path

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use payment::{PaymentMethod, WalletProvider};
pub use query::{filter_reservations, QueryScope, ReservationFilter};
pub use stats::SalesSummary;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and keeps reservation slips printable.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single title in a cart line
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 100 instead of 10).
/// Stock clamping usually kicks in well before this ceiling.
pub const MAX_LINE_QUANTITY: i64 = 999;
