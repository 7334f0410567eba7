//! # Reservation Query/Filter
//!
//! Pure filtering over reservation lists. The engine fetches rows and hands
//! them here; nothing in this module touches I/O, which is what makes the
//! date-window and scope rules trivially testable.
//!
//! ## Filter Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ReservationFilter                                                      │
//! │                                                                         │
//! │  start_date ──► created_at >= start 00:00 (inclusive)                  │
//! │  end_date ────► created_at <  end+1day 00:00 (exclusive)               │
//! │                 so start = end = 2024-01-01 means "that whole day"     │
//! │                                                                         │
//! │  text ────────► case-insensitive substring of customer_name, OR        │
//! │                 (digits only) substring of the reservation number      │
//! │                                                                         │
//! │  scope ───────► All: everything (admins)                               │
//! │                 Own: the seller's rows, plus EVERY pending row -       │
//! │                 pending is the shared fulfilment queue                 │
//! │                                                                         │
//! │  Result is always ordered most recent first.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Reservation, ReservationStatus, StaffRole};

// =============================================================================
// Query Scope
// =============================================================================

/// Whose reservations the caller may see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryScope {
    /// Store-wide visibility (admins).
    All,
    /// One seller's reservations plus the shared pending queue.
    Own { user_id: String },
}

impl QueryScope {
    /// Builds the scope for a staff member.
    pub fn for_staff(role: StaffRole, user_id: &str) -> Self {
        match role {
            StaffRole::Admin => QueryScope::All,
            StaffRole::Seller => QueryScope::Own {
                user_id: user_id.to_string(),
            },
        }
    }
}

impl Default for QueryScope {
    fn default() -> Self {
        QueryScope::All
    }
}

// =============================================================================
// Reservation Filter
// =============================================================================

/// Filter criteria for the reservation list. All fields are optional;
/// an empty filter returns everything (newest first).
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReservationFilter {
    /// Inclusive first day of the window.
    #[ts(as = "Option<String>")]
    pub start_date: Option<NaiveDate>,

    /// Inclusive last day of the window.
    #[ts(as = "Option<String>")]
    pub end_date: Option<NaiveDate>,

    /// Customer-name or reservation-number needle.
    pub text: Option<String>,

    /// Visibility scope.
    pub scope: QueryScope,
}

/// Applies the filter and returns matching reservations, newest first.
pub fn filter_reservations(
    reservations: &[Reservation],
    filter: &ReservationFilter,
) -> Vec<Reservation> {
    let mut out: Vec<Reservation> = reservations
        .iter()
        .filter(|r| matches(r, filter))
        .cloned()
        .collect();

    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}

fn matches(reservation: &Reservation, filter: &ReservationFilter) -> bool {
    scope_matches(reservation, &filter.scope)
        && date_matches(
            reservation.created_at,
            filter.start_date,
            filter.end_date,
        )
        && text_matches(reservation, filter.text.as_deref().unwrap_or(""))
}

fn scope_matches(reservation: &Reservation, scope: &QueryScope) -> bool {
    match scope {
        QueryScope::All => true,
        QueryScope::Own { user_id } => {
            // Pending reservations are everyone's to fulfil
            reservation.status == ReservationStatus::Pending
                || reservation.user_id.as_deref() == Some(user_id.as_str())
        }
    }
}

fn date_matches(
    created_at: DateTime<Utc>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> bool {
    if let Some(start) = start {
        if created_at < start.and_time(NaiveTime::MIN).and_utc() {
            return false;
        }
    }

    if let Some(end) = end {
        // Inclusive end day: reject everything from the following midnight on
        if let Some(day_after) = end.succ_opt() {
            if created_at >= day_after.and_time(NaiveTime::MIN).and_utc() {
                return false;
            }
        }
    }

    true
}

fn text_matches(reservation: &Reservation, needle: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return true;
    }

    let lowered = needle.to_lowercase();
    if reservation.customer_name.to_lowercase().contains(&lowered) {
        return true;
    }

    // Digits-only needles also match against the reservation number,
    // so "10" finds #104 and #210
    needle.chars().all(|c| c.is_ascii_digit())
        && reservation.reservation_number.to_string().contains(needle)
}

// =============================================================================
// Unit Tests
// =============================================================================
