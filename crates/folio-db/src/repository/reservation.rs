//! # Reservation Repository
//!
//! Database operations for reservation headers and their line items.
//!
//! ## Per-Row Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Why There Is No Transaction Here                           │
//! │                                                                         │
//! │  The reservation builder writes header and items as separate rows:     │
//! │                                                                         │
//! │  insert_header(r)                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  insert_item(item 1) ── insert_item(item 2) ── ...                     │
//! │       │                                                                 │
//! │       ├── all good       → reservation exists                          │
//! │       └── any item fails → builder calls delete_items, then            │
//! │                            delete_header (compensating rollback)       │
//! │                                                                         │
//! │  The foreign key from items to the header enforces the delete order:   │
//! │  items first, header last.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Number Sequence
//! `reservation_number` comes from the `sequences` table via a single
//! `UPDATE ... RETURNING` statement, so two concurrent allocations can never
//! observe the same value. Numbers allocated for reservations that are then
//! rolled back leave gaps; gaps are fine, duplicates are not.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use folio_core::{Reservation, ReservationItem, ReservationStatus};

/// Name of the sequence row backing reservation numbers.
const RESERVATION_SEQUENCE: &str = "reservation_number";

/// Repository for reservation database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ReservationRepository::new(pool);
///
/// let number = repo.next_reservation_number().await?;
/// repo.insert_header(&reservation).await?;
/// repo.insert_item(&item).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: SqlitePool,
}

impl ReservationRepository {
    /// Creates a new ReservationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReservationRepository { pool }
    }

    /// Allocates the next reservation number.
    ///
    /// ## How It Works
    /// One `UPDATE ... RETURNING` statement increments the counter and hands
    /// back the new value. The store serializes the write, so concurrent
    /// callers get distinct, increasing numbers without any lock on our side.
    ///
    /// ## Returns
    /// The freshly allocated number (first allocation returns 1).
    pub async fn next_reservation_number(&self) -> DbResult<i64> {
        let number: i64 = sqlx::query_scalar(
            "UPDATE sequences SET value = value + 1 WHERE name = ?1 RETURNING value",
        )
        .bind(RESERVATION_SEQUENCE)
        .fetch_one(&self.pool)
        .await?;

        debug!(number, "Allocated reservation number");
        Ok(number)
    }

    /// Inserts a reservation header row.
    pub async fn insert_header(&self, reservation: &Reservation) -> DbResult<Reservation> {
        debug!(
            id = %reservation.id,
            number = reservation.reservation_number,
            "Inserting reservation header"
        );

        sqlx::query(
            r#"
            INSERT INTO reservations (
                id, reservation_number, customer_name, customer_phone,
                customer_alternative_phone, customer_email, pickup_location,
                payment_method, notes, total_amount_cents, status, user_id,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&reservation.id)
        .bind(reservation.reservation_number)
        .bind(&reservation.customer_name)
        .bind(&reservation.customer_phone)
        .bind(&reservation.customer_alternative_phone)
        .bind(&reservation.customer_email)
        .bind(&reservation.pickup_location)
        .bind(&reservation.payment_method)
        .bind(&reservation.notes)
        .bind(reservation.total_amount_cents)
        .bind(reservation.status)
        .bind(&reservation.user_id)
        .bind(reservation.created_at)
        .bind(reservation.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(reservation.clone())
    }

    /// Inserts a single reservation line item.
    pub async fn insert_item(&self, item: &ReservationItem) -> DbResult<ReservationItem> {
        debug!(
            reservation_id = %item.reservation_id,
            book_id = %item.book_id,
            quantity = item.quantity,
            "Inserting reservation item"
        );

        sqlx::query(
            r#"
            INSERT INTO reservation_items (
                id, reservation_id, book_id, title_snapshot,
                quantity, unit_price_cents, total_price_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&item.id)
        .bind(&item.reservation_id)
        .bind(&item.book_id)
        .bind(&item.title_snapshot)
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .bind(item.total_price_cents)
        .bind(item.created_at)
        .execute(&self.pool)
        .await?;

        Ok(item.clone())
    }

    /// Deletes every item of a reservation.
    ///
    /// Idempotent: deleting items that are already gone is not an error.
    /// This is the first half of the compensating rollback.
    ///
    /// ## Returns
    /// Number of rows removed.
    pub async fn delete_items(&self, reservation_id: &str) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM reservation_items WHERE reservation_id = ?1")
            .bind(reservation_id)
            .execute(&self.pool)
            .await?;

        debug!(
            reservation_id = %reservation_id,
            removed = result.rows_affected(),
            "Deleted reservation items"
        );
        Ok(result.rows_affected())
    }

    /// Deletes a reservation header row.
    ///
    /// Idempotent, same as [`delete_items`](Self::delete_items). Must run
    /// after the items are gone or the foreign key rejects it.
    pub async fn delete_header(&self, reservation_id: &str) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = ?1")
            .bind(reservation_id)
            .execute(&self.pool)
            .await?;

        debug!(
            reservation_id = %reservation_id,
            removed = result.rows_affected(),
            "Deleted reservation header"
        );
        Ok(result.rows_affected())
    }

    /// Gets a reservation header by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Reservation))` - Reservation found
    /// * `Ok(None)` - Reservation not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Reservation>> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT id, reservation_number, customer_name, customer_phone,
                   customer_alternative_phone, customer_email, pickup_location,
                   payment_method, notes, total_amount_cents, status, user_id,
                   created_at, updated_at
            FROM reservations
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }

    /// Lists the items of a reservation in insertion order.
    pub async fn items(&self, reservation_id: &str) -> DbResult<Vec<ReservationItem>> {
        let items = sqlx::query_as::<_, ReservationItem>(
            r#"
            SELECT id, reservation_id, book_id, title_snapshot,
                   quantity, unit_price_cents, total_price_cents, created_at
            FROM reservation_items
            WHERE reservation_id = ?1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(reservation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists every reservation header, newest first.
    ///
    /// Date/text/scope filtering happens in memory on top of this list, so
    /// the filter rules live in one place instead of being split between
    /// SQL and Rust.
    pub async fn list(&self) -> DbResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT id, reservation_number, customer_name, customer_phone,
                   customer_alternative_phone, customer_email, pickup_location,
                   payment_method, notes, total_amount_cents, status, user_id,
                   created_at, updated_at
            FROM reservations
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    /// Moves a reservation to a new status, guarded by the expected current
    /// status.
    ///
    /// ## Optimistic Guard
    /// The `WHERE status = ?` clause makes the transition a compare-and-swap:
    /// if staff on another terminal changed the status after the caller
    /// loaded it, zero rows match and the caller gets `NotFound` with the
    /// expected status in the entity label, instead of silently overwriting
    /// the newer state.
    ///
    /// `notes`, when provided, replaces the stored notes.
    pub async fn update_status(
        &self,
        id: &str,
        expected: ReservationStatus,
        next: ReservationStatus,
        notes: Option<&str>,
    ) -> DbResult<()> {
        debug!(
            id = %id,
            from = %expected,
            to = %next,
            "Updating reservation status"
        );

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET status = ?2, notes = COALESCE(?3, notes), updated_at = ?4
            WHERE id = ?1 AND status = ?5
            "#,
        )
        .bind(id)
        .bind(next)
        .bind(notes)
        .bind(now)
        .bind(expected)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                format!("Reservation ({})", expected),
                id,
            ));
        }

        Ok(())
    }

    /// Counts reservation headers (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new reservation ID.
pub fn generate_reservation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Helper to generate a new reservation item ID.
pub fn generate_item_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
