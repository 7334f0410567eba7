//! # Error Types
//!
//! The two error layers of folio-core. [`ValidationError`] rejects bad
//! input before any business logic runs; [`CoreError`] reports business
//! rule violations and absorbs validation failures via `#[from]`.
//!
//! Downstream, folio-db adds `DbError` and folio-engine folds all three
//! into the `EngineError` callers actually see:
//!
//! ```text
//! ValidationError → CoreError → (DbError) → EngineError → caller
//! ```
//!
//! The two stock errors are deliberately distinct. [`CoreError::StockExceeded`]
//! is the soft cart-time clamp signal; [`CoreError::InsufficientStock`] is the
//! hard commit-time rejection. Conflating them would either block carts too
//! early or let reservations overshoot the shelf.

use thiserror::Error;

use crate::types::ReservationStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Requested quantity cannot be covered by current stock.
    ///
    /// The hard, commit-time rejection. A reservation containing this
    /// line must not be created at all; the caller sees the title, what
    /// was asked for, and what the shelf actually holds.
    #[error("Insufficient stock for {title}: available {available}, requested {requested}")]
    InsufficientStock {
        book_id: String,
        title: String,
        available: i64,
        requested: i64,
    },

    /// A cart line was clamped down to the known stock level.
    ///
    /// The soft, cart-time signal. The cart keeps the clamped line and
    /// stays usable; the caller surfaces the message. The authoritative
    /// check still happens when the reservation is created.
    #[error("Only {available} in stock for this title")]
    StockExceeded { book_id: String, available: i64 },

    /// The book is not in the cart.
    #[error("Book {0} is not in the cart")]
    NotInCart(String),

    /// The cart is at its distinct-line ceiling.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// A single line asked for more copies than any order may hold.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// The requested status change is not an edge in the workflow graph,
    /// such as reopening a completed or cancelled reservation.
    #[error("Reservation cannot change status from {from} to {to}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    /// Input failed validation before business logic ran.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input rejections, raised before any state is read or written.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The field was blank once trimmed.
    #[error("{field} is required")]
    Required { field: String },

    /// Fewer characters than the field's floor.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// More characters than the field's ceiling.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// A number outside its allowed window.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Zero or negative where only positive makes sense.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// The shape is wrong: malformed UUID, bad wallet number, and so on.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Shorthand for results that fail with [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_messages_name_the_numbers() {
        let err = CoreError::InsufficientStock {
            book_id: "b-1".to_string(),
            title: "Dom Casmurro".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Dom Casmurro: available 3, requested 5"
        );

        let err = CoreError::StockExceeded {
            book_id: "b-1".to_string(),
            available: 2,
        };
        assert_eq!(err.to_string(), "Only 2 in stock for this title");

        let err = CoreError::InvalidTransition {
            from: ReservationStatus::Completed,
            to: ReservationStatus::Pending,
        };
        assert_eq!(
            err.to_string(),
            "Reservation cannot change status from completed to pending"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "customer name".to_string(),
        };
        assert_eq!(err.to_string(), "customer name is required");

        let err = ValidationError::TooLong {
            field: "title".to_string(),
            max: 200,
        };
        assert_eq!(err.to_string(), "title must be at most 200 characters");

        let err = ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: 999,
        };
        assert_eq!(err.to_string(), "quantity must be between 1 and 999");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "customer name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
