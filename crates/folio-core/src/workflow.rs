//! # Reservation Status Workflow
//!
//! The transition rules for [`ReservationStatus`]. The enum itself lives in
//! [`crate::types`]; this module is the single place that knows which edges
//! exist, so drivers never hand-roll status checks.
//!
//! ## The Graph
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   pending ──────► confirmed ──────► completed   (terminal)             │
//! │      │                 │                                                │
//! │      │                 └──────────► cancelled   (terminal)             │
//! │      ├────────────────────────────► cancelled                          │
//! │      └────────────────────────────► completed                          │
//! │                                                                         │
//! │   Statuses only move forward. A completed or cancelled reservation     │
//! │   is never reopened - corrections are new reservations.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pending → completed edge is real and used daily: staff complete a
//! pickup directly without a separate confirmation step.

use crate::types::ReservationStatus;

impl ReservationStatus {
    /// Checks whether this status may change to `next`.
    ///
    /// Self-transitions are not allowed; a no-op update is a caller bug
    /// worth surfacing, not a silent success.
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Completed)
                | (Pending, Cancelled)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
        )
    }

    /// Checks whether this status admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Completed | ReservationStatus::Cancelled
        )
    }

    /// Returns the statuses reachable from this one, in workflow order.
    /// Handy for rendering the staff action menu.
    pub fn allowed_transitions(&self) -> &'static [ReservationStatus] {
        use ReservationStatus::*;
        match self {
            Pending => &[Confirmed, Completed, Cancelled],
            Confirmed => &[Completed, Cancelled],
            Completed | Cancelled => &[],
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    #[test]
    fn test_pending_edges() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_confirmed_edges() {
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Confirmed));
    }

    #[test]
    fn test_terminal_states_admit_nothing() {
        for terminal in [Completed, Cancelled] {
            assert!(terminal.is_terminal());
            for next in [Pending, Confirmed, Completed, Cancelled] {
                assert!(!terminal.can_transition_to(next));
            }
            assert!(terminal.allowed_transitions().is_empty());
        }
    }

    #[test]
    fn test_non_terminal_states() {
        assert!(!Pending.is_terminal());
        assert!(!Confirmed.is_terminal());
    }

    #[test]
    fn test_allowed_transitions_match_can_transition() {
        for from in [Pending, Confirmed, Completed, Cancelled] {
            for to in [Pending, Confirmed, Completed, Cancelled] {
                let listed = from.allowed_transitions().contains(&to);
                assert_eq!(listed, from.can_transition_to(to));
            }
        }
    }
}
