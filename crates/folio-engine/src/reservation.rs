//! # Reservation Builder and Workflow
//!
//! Creating a reservation is the commit point of the two-phase stock story:
//! the cart clamped softly while the customer browsed, HERE the engine
//! re-fetches every row and rejects the whole batch if any line no longer
//! fits. What gets written is a header plus one row per line, with prices
//! and titles frozen.
//!
//! ## Why Compensating Deletes Instead of a Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Reservation Write Path                                 │
//! │                                                                         │
//! │  validate draft ──► re-fetch books ──► check stock ──► allocate number │
//! │                                                              │          │
//! │                                                              ▼          │
//! │                                                      insert header     │
//! │                                                              │          │
//! │                                              ┌───────────────┤          │
//! │                                              │               ▼          │
//! │                                              │       insert item 1..N  │
//! │                                              │               │          │
//! │                                     item insert fails        ▼          │
//! │                                              │            done ──► Ok  │
//! │                                              ▼                          │
//! │                                      delete items, then header          │
//! │                                      (idempotent), surface the          │
//! │                                      ORIGINAL error                     │
//! │                                                                         │
//! │  Every statement is a single-row write on one connection, so the       │
//! │  rollback is explicit instead of transactional. A crash between        │
//! │  writes leaves an orphan header that the same deletes clean up.        │
//! │                                                                         │
//! │  Stock is NOT touched here. Reservations claim copies; the decrement   │
//! │  happens when staff complete the pickup.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Workflow
//! ```text
//!   pending ──► confirmed ──► completed   (stock decrements here, once)
//!      │             │
//!      └─────────────┴──────► cancelled   (nothing is restored; stock
//!                                          never moved for this claim)
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use folio_core::query::{filter_reservations, ReservationFilter};
use folio_core::types::{
    Book, CustomerDetails, OrderLine, Reservation, ReservationDraft, ReservationItem,
    ReservationStatus,
};
use folio_core::validation::{
    validate_customer_name, validate_email, validate_phone, validate_quantity,
    validate_search_text,
};
use folio_core::PaymentMethod;
use folio_db::repository::reservation::{generate_item_id, generate_reservation_id};

use crate::error::{EngineError, EngineResult};
use crate::Engine;

// =============================================================================
// Response DTOs
// =============================================================================

/// A reservation header together with its items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDetail {
    pub reservation: Reservation,
    pub items: Vec<ReservationItem>,
}

// =============================================================================
// Reservation Operations
// =============================================================================

impl Engine {
    /// Creates a reservation from a draft.
    ///
    /// ## Behavior
    /// - Customer details and payment are validated before anything else
    /// - Duplicate lines for the same book are merged
    /// - Every book is re-fetched; prices and titles come from the rows,
    ///   never from the client
    /// - One line the stock cannot cover rejects the WHOLE draft with
    ///   [`EngineError::InsufficientStock`]; nothing is written
    /// - Stock is not decremented; the claim is only a claim until pickup
    ///
    /// ## Returns
    /// The stored header, carrying the allocated reservation number.
    pub async fn create_reservation(&self, draft: ReservationDraft) -> EngineResult<Reservation> {
        debug!(lines = draft.lines.len(), "create_reservation");

        // Boundary checks first; nothing below runs against bad input
        validate_customer_name(&draft.customer.name)?;
        validate_phone(&draft.customer.phone)?;
        if let Some(phone) = &draft.customer.alternative_phone {
            validate_phone(phone)?;
        }
        if let Some(email) = &draft.customer.email {
            validate_email(email)?;
        }
        let payment_label = draft.payment.validated_label()?;

        if draft.lines.is_empty() {
            return Err(EngineError::validation(
                "Reservation needs at least one book",
            ));
        }
        for line in &draft.lines {
            validate_quantity(line.quantity)?;
        }

        // Collapse duplicate lines the same way the cart merge does
        let mut wanted: Vec<OrderLine> = Vec::with_capacity(draft.lines.len());
        for line in &draft.lines {
            match wanted.iter_mut().find(|w| w.book_id == line.book_id) {
                Some(existing) => existing.quantity += line.quantity,
                None => wanted.push(line.clone()),
            }
        }
        for line in &wanted {
            // Merged quantities can exceed the per-line cap
            validate_quantity(line.quantity)?;
        }

        // Authoritative rows; a retired book behaves like a missing one
        let mut priced: Vec<(Book, i64)> = Vec::with_capacity(wanted.len());
        for line in &wanted {
            let book = self
                .db
                .books()
                .get_by_id(&line.book_id)
                .await?
                .filter(|b| b.is_active)
                .ok_or_else(|| EngineError::not_found("Book", &line.book_id))?;
            priced.push((book, line.quantity));
        }

        // Hard stock check: all lines fit or none are written
        for (book, quantity) in &priced {
            if !book.can_fulfill(*quantity) {
                return Err(EngineError::InsufficientStock {
                    book_id: book.id.clone(),
                    title: book.title.clone(),
                    available: book.stock,
                    requested: *quantity,
                });
            }
        }

        let total_amount_cents: i64 = priced.iter().map(|(b, q)| b.price_cents * q).sum();

        let number = self.db.reservations().next_reservation_number().await?;
        let now = Utc::now();
        let reservation = Reservation {
            id: generate_reservation_id(),
            reservation_number: number,
            customer_name: draft.customer.name.trim().to_string(),
            customer_phone: draft.customer.phone.trim().to_string(),
            customer_alternative_phone: draft.customer.alternative_phone,
            customer_email: draft.customer.email,
            pickup_location: draft.customer.pickup_location,
            payment_method: payment_label.to_string(),
            notes: draft.notes,
            total_amount_cents,
            status: ReservationStatus::Pending,
            user_id: draft.user_id,
            created_at: now,
            updated_at: now,
        };

        self.db.reservations().insert_header(&reservation).await?;

        for (book, quantity) in &priced {
            let item = ReservationItem {
                id: generate_item_id(),
                reservation_id: reservation.id.clone(),
                book_id: book.id.clone(),
                title_snapshot: book.title.clone(),
                quantity: *quantity,
                unit_price_cents: book.price_cents,
                total_price_cents: book.price_cents * quantity,
                created_at: now,
            };

            if let Err(err) = self.db.reservations().insert_item(&item).await {
                self.roll_back_partial(&reservation.id).await;
                return Err(err.into());
            }
        }

        info!(
            reservation_id = %reservation.id,
            number = %reservation.reservation_number,
            total = %total_amount_cents,
            items = priced.len(),
            "Reservation created"
        );

        Ok(reservation)
    }

    /// Creates a reservation from the current cart, then clears the cart.
    ///
    /// ## Behavior
    /// The cart lines become the draft lines; everything else follows
    /// [`Engine::create_reservation`]. The cart is cleared only after the
    /// reservation is safely stored, so a rejected checkout leaves the
    /// cart intact for another try.
    pub async fn checkout_cart(
        &self,
        customer: CustomerDetails,
        payment: PaymentMethod,
        notes: Option<String>,
        user_id: Option<String>,
    ) -> EngineResult<Reservation> {
        debug!("checkout_cart");

        let lines = self.cart.with_cart(|c| c.order_lines());
        if lines.is_empty() {
            return Err(EngineError::validation("Cart is empty"));
        }

        let draft = ReservationDraft {
            customer,
            payment,
            notes,
            user_id,
            lines,
        };
        let reservation = self.create_reservation(draft).await?;

        self.cart.with_cart_mut(|c| c.clear());

        Ok(reservation)
    }

    /// Moves a reservation through the status workflow.
    ///
    /// ## Behavior
    /// - The transition must be allowed by the workflow graph, otherwise
    ///   [`EngineError::InvalidTransition`]
    /// - The write is guarded on the loaded status; staff racing on two
    ///   terminals cannot overwrite each other's transition
    /// - Moving to `completed` decrements stock for every item, clamped at
    ///   zero. The status guard makes that decrement happen at most once
    ///   per reservation
    /// - Cancellation restores nothing; stock never moved for the claim
    /// - `notes`, when provided, replaces the stored notes
    ///
    /// ## Returns
    /// The reservation as stored after the transition.
    pub async fn update_reservation_status(
        &self,
        id: &str,
        next: ReservationStatus,
        notes: Option<String>,
    ) -> EngineResult<Reservation> {
        debug!(id = %id, to = %next, "update_reservation_status");

        let current = self
            .db
            .reservations()
            .get_by_id(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Reservation", id))?;

        if !current.status.can_transition_to(next) {
            return Err(EngineError::InvalidTransition {
                from: current.status,
                to: next,
            });
        }

        self.db
            .reservations()
            .update_status(id, current.status, next, notes.as_deref())
            .await?;

        // Completion is the moment the copies leave the shelf
        if next == ReservationStatus::Completed {
            let items = self.db.reservations().items(id).await?;
            for item in &items {
                match self
                    .db
                    .books()
                    .decrement_stock(&item.book_id, item.quantity)
                    .await
                {
                    Ok(remaining) => {
                        debug!(
                            book_id = %item.book_id,
                            quantity = %item.quantity,
                            remaining = %remaining,
                            "Stock decremented for completed reservation"
                        );
                    }
                    Err(err) => {
                        // The handover already happened; keep going and let
                        // the ledger show what it can
                        error!(
                            reservation_id = %id,
                            book_id = %item.book_id,
                            %err,
                            "Stock decrement failed during completion"
                        );
                    }
                }
            }
        }

        let updated = self
            .db
            .reservations()
            .get_by_id(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Reservation", id))?;

        info!(
            reservation_id = %id,
            from = %current.status,
            to = %next,
            "Reservation status updated"
        );

        Ok(updated)
    }

    /// Gets one reservation with its items.
    pub async fn get_reservation(&self, id: &str) -> EngineResult<ReservationDetail> {
        debug!(id = %id, "get_reservation");

        let reservation = self
            .db
            .reservations()
            .get_by_id(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Reservation", id))?;
        let items = self.db.reservations().items(id).await?;

        Ok(ReservationDetail { reservation, items })
    }

    /// Lists reservations matching a filter, newest first.
    ///
    /// ## Behavior
    /// Rows are fetched in one go and filtered in memory; date window,
    /// text needle and visibility scope all live in folio-core where they
    /// are pure and tested. The needle is length-checked here.
    pub async fn list_reservations(
        &self,
        filter: ReservationFilter,
    ) -> EngineResult<Vec<Reservation>> {
        debug!(?filter, "list_reservations");

        let mut filter = filter;
        if let Some(text) = filter.text.take() {
            let needle = validate_search_text(&text)?;
            if !needle.is_empty() {
                filter.text = Some(needle);
            }
        }

        let all = self.db.reservations().list().await?;
        Ok(filter_reservations(&all, &filter))
    }

    /// Compensating cleanup for a half-written reservation.
    ///
    /// Items go first, then the header; the foreign key insists on that
    /// order and both deletes are idempotent, so an interrupted rollback
    /// can simply run again. Failures here are logged and swallowed; the
    /// caller surfaces the ORIGINAL write error, not the cleanup's.
    async fn roll_back_partial(&self, reservation_id: &str) {
        warn!(
            reservation_id = %reservation_id,
            "Rolling back partially written reservation"
        );

        if let Err(err) = self.db.reservations().delete_items(reservation_id).await {
            error!(
                reservation_id = %reservation_id,
                %err,
                "Rollback could not delete items"
            );
            return;
        }
        if let Err(err) = self.db.reservations().delete_header(reservation_id).await {
            error!(
                reservation_id = %reservation_id,
                %err,
                "Rollback could not delete header"
            );
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use folio_core::payment::WalletProvider;
    use folio_core::query::QueryScope;
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

    fn customer(name: &str) -> CustomerDetails {
        CustomerDetails {
            name: name.to_string(),
            phone: "841234567".to_string(),
            alternative_phone: None,
            email: None,
            pickup_location: None,
        }
    }

    fn draft(name: &str, lines: &[(&str, i64)]) -> ReservationDraft {
        ReservationDraft {
            customer: customer(name),
            payment: PaymentMethod::Cash,
            notes: None,
            user_id: None,
            lines: lines
                .iter()
                .map(|(book_id, quantity)| OrderLine {
                    book_id: book_id.to_string(),
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    async fn stock_of(engine: &Engine, id: &str) -> i64 {
        engine.db.books().get_by_id(id).await.unwrap().unwrap().stock
    }

    #[tokio::test]
    async fn test_create_reservation_happy_path() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2500, 10).await;
        seed_book(&engine, "b-2", 1800, 4).await;

        let created = engine
            .create_reservation(draft("Ana Macamo", &[("b-1", 2), ("b-2", 1)]))
            .await
            .unwrap();

        assert_eq!(created.reservation_number, 1);
        assert_eq!(created.status, ReservationStatus::Pending);
        assert_eq!(created.payment_method, "Numerário");
        // Total comes from the rows, not the client
        assert_eq!(created.total_amount_cents, 2 * 2500 + 1800);

        let detail = engine.get_reservation(&created.id).await.unwrap();
        assert_eq!(detail.items.len(), 2);
        assert_eq!(detail.items[0].title_snapshot, "Book b-1");
        assert_eq!(detail.items[0].total_price_cents, 5000);

        // Creation claims copies without moving stock
        assert_eq!(stock_of(&engine, "b-1").await, 10);
        assert_eq!(stock_of(&engine, "b-2").await, 4);
    }

    #[tokio::test]
    async fn test_create_merges_duplicate_lines() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2000, 10).await;

        let created = engine
            .create_reservation(draft("Ana Macamo", &[("b-1", 1), ("b-1", 2)]))
            .await
            .unwrap();

        let detail = engine.get_reservation(&created.id).await.unwrap();
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].quantity, 3);
        assert_eq!(created.total_amount_cents, 6000);
    }

    #[tokio::test]
    async fn test_one_short_line_rejects_the_whole_batch() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2500, 10).await;
        seed_book(&engine, "b-2", 1800, 1).await;

        let err = engine
            .create_reservation(draft("Ana Macamo", &[("b-1", 2), ("b-2", 3)]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::InsufficientStock {
                available: 1,
                requested: 3,
                ..
            }
        ));

        // Nothing was written, nothing moved
        assert_eq!(engine.db.reservations().count().await.unwrap(), 0);
        assert_eq!(stock_of(&engine, "b-1").await, 10);
    }

    #[tokio::test]
    async fn test_unknown_and_retired_books_reject_the_draft() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2500, 10).await;

        let err = engine
            .create_reservation(draft("Ana Macamo", &[("missing", 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));

        let mut retired = engine.db.books().get_by_id("b-1").await.unwrap().unwrap();
        retired.is_active = false;
        engine.db.books().update(&retired).await.unwrap();

        let err = engine
            .create_reservation(draft("Ana Macamo", &[("b-1", 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));

        assert_eq!(engine.db.reservations().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_draft_validation_runs_before_any_write() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2500, 10).await;

        // No lines
        let err = engine
            .create_reservation(draft("Ana Macamo", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        // Unusable phone
        let mut bad_phone = draft("Ana Macamo", &[("b-1", 1)]);
        bad_phone.customer.phone = "call me".to_string();
        let err = engine.create_reservation(bad_phone).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        // M-Pesa number with the wrong prefix
        let mut bad_wallet = draft("Ana Macamo", &[("b-1", 1)]);
        bad_wallet.payment = PaymentMethod::MobileWallet {
            provider: WalletProvider::MPesa,
            number: "861234567".to_string(),
        };
        let err = engine.create_reservation(bad_wallet).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        assert_eq!(engine.db.reservations().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_wallet_payment_stores_the_label_only() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2500, 10).await;

        let mut wallet = draft("Ana Macamo", &[("b-1", 1)]);
        wallet.payment = PaymentMethod::MobileWallet {
            provider: WalletProvider::MPesa,
            number: "84 123 4567".to_string(),
        };

        let created = engine.create_reservation(wallet).await.unwrap();
        assert_eq!(created.payment_method, "M-Pesa");
    }

    #[tokio::test]
    async fn test_concurrent_claims_on_last_copy_both_succeed() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 3200, 1).await;

        // Two customers reserve the final copy at the same time. Both claims
        // are accepted; staff resolve the pickup order at the counter.
        let (first, second) = tokio::join!(
            engine.create_reservation(draft("Ana Macamo", &[("b-1", 1)])),
            engine.create_reservation(draft("Bruno Sitoe", &[("b-1", 1)])),
        );

        let first = first.unwrap();
        let second = second.unwrap();
        assert_ne!(first.reservation_number, second.reservation_number);
        assert_eq!(engine.db.reservations().count().await.unwrap(), 2);
        assert_eq!(stock_of(&engine, "b-1").await, 1);
    }

    #[tokio::test]
    async fn test_completion_decrements_each_item_once() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2500, 5).await;
        seed_book(&engine, "b-2", 1800, 2).await;

        let created = engine
            .create_reservation(draft("Ana Macamo", &[("b-1", 2), ("b-2", 2)]))
            .await
            .unwrap();

        let confirmed = engine
            .update_reservation_status(&created.id, ReservationStatus::Confirmed, None)
            .await
            .unwrap();
        assert_eq!(confirmed.status, ReservationStatus::Confirmed);
        assert_eq!(stock_of(&engine, "b-1").await, 5);

        let completed = engine
            .update_reservation_status(&created.id, ReservationStatus::Completed, None)
            .await
            .unwrap();
        assert_eq!(completed.status, ReservationStatus::Completed);
        assert_eq!(stock_of(&engine, "b-1").await, 3);
        assert_eq!(stock_of(&engine, "b-2").await, 0);

        // Terminal; a second completion cannot decrement again
        let err = engine
            .update_reservation_status(&created.id, ReservationStatus::Completed, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidTransition { .. }));
        assert_eq!(stock_of(&engine, "b-1").await, 3);
    }

    #[tokio::test]
    async fn test_cancellation_restores_nothing() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2500, 5).await;

        let created = engine
            .create_reservation(draft("Ana Macamo", &[("b-1", 2)]))
            .await
            .unwrap();

        let cancelled = engine
            .update_reservation_status(&created.id, ReservationStatus::Cancelled, None)
            .await
            .unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);
        // Stock never moved for this claim, so there is nothing to restore
        assert_eq!(stock_of(&engine, "b-1").await, 5);

        let err = engine
            .update_reservation_status(&created.id, ReservationStatus::Confirmed, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition {
                from: ReservationStatus::Cancelled,
                to: ReservationStatus::Confirmed,
            }
        ));
    }

    #[tokio::test]
    async fn test_update_status_keeps_notes_unless_replaced() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2500, 5).await;

        let mut with_notes = draft("Ana Macamo", &[("b-1", 1)]);
        with_notes.notes = Some("ligar antes de entregar".to_string());
        let created = engine.create_reservation(with_notes).await.unwrap();

        let confirmed = engine
            .update_reservation_status(&created.id, ReservationStatus::Confirmed, None)
            .await
            .unwrap();
        assert_eq!(
            confirmed.notes.as_deref(),
            Some("ligar antes de entregar")
        );

        let completed = engine
            .update_reservation_status(
                &created.id,
                ReservationStatus::Completed,
                Some("entregue na loja".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(completed.notes.as_deref(), Some("entregue na loja"));
    }

    #[tokio::test]
    async fn test_update_status_unknown_reservation() {
        let engine = test_engine().await;

        let err = engine
            .update_reservation_status("missing", ReservationStatus::Confirmed, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_reservation_not_found() {
        let engine = test_engine().await;

        let err = engine.get_reservation("missing").await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_reservations_text_and_scope() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2500, 10).await;

        engine
            .create_reservation(draft("Ana Macamo", &[("b-1", 1)]))
            .await
            .unwrap();

        let mut brunos = draft("Bruno Sitoe", &[("b-1", 1)]);
        brunos.user_id = Some("u9".to_string());
        let brunos = engine.create_reservation(brunos).await.unwrap();
        engine
            .update_reservation_status(&brunos.id, ReservationStatus::Confirmed, None)
            .await
            .unwrap();

        // Text needle matches the customer name, case-insensitively
        let found = engine
            .list_reservations(ReservationFilter {
                text: Some("  BRUNO ".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].customer_name, "Bruno Sitoe");

        // A seller sees the shared pending queue but not another seller's
        // confirmed reservation
        let scoped = engine
            .list_reservations(ReservationFilter {
                scope: QueryScope::Own {
                    user_id: "u1".to_string(),
                },
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].customer_name, "Ana Macamo");
    }

    #[tokio::test]
    async fn test_list_reservations_rejects_oversized_needle() {
        let engine = test_engine().await;

        let err = engine
            .list_reservations(ReservationFilter {
                text: Some("x".repeat(200)),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_checkout_cart_creates_and_clears() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2500, 10).await;

        engine.add_to_cart("b-1", Some(2)).await.unwrap();

        let created = engine
            .checkout_cart(customer("Ana Macamo"), PaymentMethod::Cash, None, None)
            .await
            .unwrap();
        assert_eq!(created.total_amount_cents, 5000);
        assert!(engine.get_cart().lines.is_empty());

        // An empty cart cannot check out again
        let err = engine
            .checkout_cart(customer("Ana Macamo"), PaymentMethod::Cash, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_rejected_checkout_keeps_the_cart() {
        let engine = test_engine().await;
        seed_book(&engine, "b-1", 2500, 2).await;

        engine.add_to_cart("b-1", Some(2)).await.unwrap();

        // Stock drains between browsing and checkout
        engine.db.books().decrement_stock("b-1", 1).await.unwrap();

        let err = engine
            .checkout_cart(customer("Ana Macamo"), PaymentMethod::Cash, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientStock { .. }));

        // The cart survives for another try
        assert_eq!(engine.get_cart().lines[0].quantity, 2);
        assert_eq!(engine.db.reservations().count().await.unwrap(), 0);
    }
}
