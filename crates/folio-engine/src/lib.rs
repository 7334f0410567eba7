//! # Folio Engine
//!
//! The orchestration layer of the reservation engine. Pure rules live in
//! `folio-core`, SQL lives in `folio-db`; this crate wires them together
//! behind one [`Engine`] handle that a host (desktop shell, HTTP server,
//! CLI) can embed.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              Engine                                     │
//! │                                                                         │
//! │   cart         catalog          reservation            stock            │
//! │   browsing     listing and      builder, rollback,     walk-in sales,   │
//! │   with soft    book-of-the-     status workflow,       decrements,      │
//! │   clamping     day pick         filtered queries       daily summary    │
//! │      │             │                  │                   │             │
//! │      ▼             ▼                  ▼                   ▼             │
//! │  ┌───────────────────────┐   ┌─────────────────────────────────────┐   │
//! │  │ folio-core            │   │ folio-db                            │   │
//! │  │ money, validation,    │   │ SQLite pool, repositories,          │   │
//! │  │ workflow, filtering   │   │ guarded single-row writes           │   │
//! │  └───────────────────────┘   └─────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Two-Phase Stock Story
//! Stock is checked twice and decremented once. The cart clamps softly while
//! the customer browses; the reservation builder re-checks hard against
//! fresh rows and writes nothing if any line no longer fits; the decrement
//! itself only happens when staff complete a pickup or ring up a walk-in
//! sale. Creating a reservation never moves stock.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod reservation;
pub mod stock;

pub use cart::{CartStore, CartTotals, CartView};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult, ErrorCode};
pub use reservation::ReservationDetail;

use tracing_subscriber::EnvFilter;

use folio_db::Database;

// =============================================================================
// Engine
// =============================================================================

/// The one handle a host embeds.
///
/// Construction is cheap; the expensive part is the [`Database`] the caller
/// opens first. The cart starts empty. Operations are `&self` and safe to
/// call from concurrent tasks: the cart serializes behind its own mutex and
/// every database write is a single guarded statement.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./folio.db")).await?;
/// let engine = Engine::new(db, EngineConfig::from_env());
///
/// engine.add_to_cart("book-id", Some(2)).await?;
/// let reservation = engine.checkout_cart(customer, payment, None, None).await?;
/// ```
#[derive(Debug)]
pub struct Engine {
    db: Database,
    config: EngineConfig,
    cart: CartStore,
}

impl Engine {
    /// Creates an engine over an open database.
    pub fn new(db: Database, config: EngineConfig) -> Self {
        Engine {
            db,
            config,
            cart: CartStore::new(),
        }
    }

    /// The store configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Direct access to the underlying database handle.
    ///
    /// Hosts use this for concerns the engine does not own, like catalog
    /// administration or backup tooling.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

// =============================================================================
// Tracing Setup
// =============================================================================

/// Initializes the tracing subscriber for a host binary.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=folio=trace` - Show trace for folio crates only
/// - Default: INFO level, DEBUG for folio crates, WARN for sqlx
///
/// Call once at startup. Library code never calls this; tests and embedding
/// hosts decide whether they want output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,folio=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

// =============================================================================
// Unit Tests
// =============================================================================
