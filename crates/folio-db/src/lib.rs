//! # folio-db: Persistence Layer for Folio
//!
//! SQLite persistence for the Folio reservation engine, built on sqlx.
//! This crate owns the schema, the pool, and every SQL statement; callers
//! go through typed repositories and never touch a raw row.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                             folio-db                                │
//! │                                                                     │
//! │  Database (pool.rs)                                                 │
//! │    ├── books()          BookRepository         catalog + stock CAS  │
//! │    ├── reservations()   ReservationRepository  headers, items,      │
//! │    │                                           status guard,        │
//! │    │                                           number sequence      │
//! │    └── sales()          SaleRepository         immutable records    │
//! │                                                                     │
//! │  migrations.rs   SQL embedded at compile time, applied on connect   │
//! │  error.rs        DbError, the only error type that leaves here      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use folio_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./folio.db")).await?;
//! let books = db.books().list().await?;
//! let number = db.reservations().next_reservation_number().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::book::BookRepository;
pub use repository::reservation::ReservationRepository;
pub use repository::sale::SaleRepository;
