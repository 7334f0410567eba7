//! # Repository Module
//!
//! Database repository implementations for Folio.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  How a Call Reaches the Database                        │
//! │                                                                         │
//! │  All SQL lives behind typed repository methods; nothing above this     │
//! │  crate writes a query string.                                          │
//! │                                                                         │
//! │  Engine Operation                                                      │
//! │       │                                                                 │
//! │       │  db.books().decrement_stock(id, 3)                             │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  BookRepository                                                        │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── list(&self)                                                       │
//! │  ├── insert(&self, book)                                               │
//! │  └── decrement_stock(&self, id, qty)   ← CAS loop on version          │
//! │       │                                                                 │
//! │       │  SQL (per-row statements only)                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Deliberate constraint: repositories expose per-row operations and     │
//! │  never open a multi-row transaction. The reservation builder gets     │
//! │  atomicity from compensating deletes, not from the store.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`book::BookRepository`] - Catalog rows and the stock ledger
//! - [`reservation::ReservationRepository`] - Headers, items, number sequence
//! - [`sale::SaleRepository`] - Immutable in-person sale records

pub mod book;
pub mod reservation;
pub mod sale;
