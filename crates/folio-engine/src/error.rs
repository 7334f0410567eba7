//! # Engine Error Type
//!
//! Unified error type for engine operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Error Flow in Folio                                │
//! │                                                                         │
//! │  Caller (UI host)             Engine                                    │
//! │  ────────────────             ──────                                    │
//! │                                                                         │
//! │  create_reservation(draft)                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Engine Operation                                                │  │
//! │  │  Result<T, EngineError>                                          │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Validation? ──── ValidationError ───────────┐                  │  │
//! │  │         │                                    │                  │  │
//! │  │         ▼                                    ▼                  │  │
//! │  │  Business rule? ─ CoreError ─────────── EngineError ───────────►│  │
//! │  │         │                                    ▲                  │  │
//! │  │         ▼                                    │                  │  │
//! │  │  Storage? ─────── DbError ───────────────────┘                  │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄────────────────────────────────────────────────────────────────────  │
//! │                                                                         │
//! │  Serialized over the boundary:                                          │
//! │  { "code": "INSUFFICIENT_STOCK",                                        │
//! │    "message": "Insufficient stock for Dom Casmurro: ..." }              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Stock Errors On Purpose
//! `StockExceeded` is the soft cart-time clamp signal (the cart keeps the
//! clamped line); `InsufficientStock` is the hard commit-time rejection
//! (nothing was written). Callers display them differently, so they carry
//! different codes.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

use folio_core::types::ReservationStatus;
use folio_core::{CoreError, ValidationError};
use folio_db::DbError;

// =============================================================================
// Engine Error
// =============================================================================

/// What callers of the engine receive when an operation fails.
///
/// ## Serialization
/// Serializes as a two-field object, whatever the variant:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Book not found: 550e8400-..."
/// }
/// ```
/// The typed variants exist for Rust callers and tests; the wire shape is
/// what frontends switch on.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input failed a boundary check. Message is safe to display.
    #[error("{0}")]
    Validation(String),

    /// A cart line was clamped down to the known stock level.
    /// The cart keeps the clamped line; this is the signal to surface.
    #[error("Only {available} in stock for this title")]
    StockExceeded { book_id: String, available: i64 },

    /// The freshly fetched stock cannot cover a requested line.
    /// The whole reservation was rejected; nothing was written.
    #[error("Insufficient stock for {title}: available {available}, requested {requested}")]
    InsufficientStock {
        book_id: String,
        title: String,
        available: i64,
        requested: i64,
    },

    /// The entity does not exist (or is not visible to the caller).
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The requested status change violates the workflow graph.
    #[error("Reservation cannot change status from {from} to {to}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    /// Concurrent writers kept winning an optimistic write race.
    /// Retrying the operation usually succeeds.
    #[error("{0}")]
    Conflict(String),

    /// Storage failure. Carries a generic message; the detail was logged
    /// where the error was translated.
    #[error("{0}")]
    Persistence(String),
}

/// Error codes for engine responses.
///
/// ## Usage in Frontend
/// ```typescript
/// try {
///   await engine.createReservation(draft);
/// } catch (e) {
///   switch (e.code) {
///     case 'INSUFFICIENT_STOCK':
///       showStockDialog(e.message);   // offer the available quantity
///       break;
///     case 'VALIDATION_ERROR':
///       markInvalidField(e.message);
///       break;
///     default:
///       toastFailure(e.message);
///   }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input failed a boundary check
    ValidationError,

    /// Cart line clamped to known stock
    StockExceeded,

    /// Reservation rejected for lack of stock
    InsufficientStock,

    /// No such book or reservation
    NotFound,

    /// Status change violates the workflow
    InvalidTransition,

    /// Optimistic write race lost repeatedly
    Conflict,

    /// Storage operation failed
    PersistenceError,
}

impl EngineError {
    /// Returns the machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::Validation(_) => ErrorCode::ValidationError,
            EngineError::StockExceeded { .. } => ErrorCode::StockExceeded,
            EngineError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            EngineError::NotFound { .. } => ErrorCode::NotFound,
            EngineError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            EngineError::Conflict(_) => ErrorCode::Conflict,
            EngineError::Persistence(_) => ErrorCode::PersistenceError,
        }
    }

    /// A NOT_FOUND error for the given entity and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// A VALIDATION_ERROR with a caller-supplied message.
    pub fn validation(message: impl Into<String>) -> Self {
        EngineError::Validation(message.into())
    }
}

/// Serializes as `{ code, message }`, the shape frontends consume.
impl Serialize for EngineError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("EngineError", 2)?;
        state.serialize_field("code", &self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Converts database errors to engine errors.
///
/// Internal failures are logged here with their detail and surface with a
/// generic message; callers never see SQL.
impl From<DbError> for EngineError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => EngineError::NotFound { entity, id },
            DbError::WriteConflict { .. } => EngineError::Conflict(err.to_string()),
            DbError::UniqueViolation { field, value } => EngineError::Validation(format!(
                "{} '{}' already exists",
                field, value
            )),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                EngineError::Validation("Invalid reference".to_string())
            }
            DbError::ConnectionFailed(_) => {
                EngineError::Persistence("Database connection failed".to_string())
            }
            DbError::MigrationFailed(_) => {
                EngineError::Persistence("Database migration failed".to_string())
            }
            DbError::QueryFailed(e) => {
                // Detail goes to the log, callers get the generic line
                tracing::error!("Database query failed: {}", e);
                EngineError::Persistence("Database operation failed".to_string())
            }
            DbError::PoolExhausted => {
                EngineError::Persistence("Database pool exhausted".to_string())
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                EngineError::Persistence("Database operation failed".to_string())
            }
        }
    }
}

/// Converts core errors to engine errors.
impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::StockExceeded { book_id, available } => {
                EngineError::StockExceeded { book_id, available }
            }
            CoreError::InsufficientStock {
                book_id,
                title,
                available,
                requested,
            } => EngineError::InsufficientStock {
                book_id,
                title,
                available,
                requested,
            },
            CoreError::InvalidTransition { from, to } => {
                EngineError::InvalidTransition { from, to }
            }
            CoreError::Validation(e) => EngineError::Validation(e.to_string()),
            other => EngineError::Validation(other.to_string()),
        }
    }
}

/// Converts raw validation errors without the "Validation error:" wrapper.
impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Validation(err.to_string())
    }
}

/// Convenience type alias for Results with EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let err = EngineError::not_found("Book", "b-1");
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Book not found: b-1");
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_stock_errors_carry_distinct_codes() {
        let soft = EngineError::StockExceeded {
            book_id: "b-1".to_string(),
            available: 3,
        };
        let hard = EngineError::InsufficientStock {
            book_id: "b-1".to_string(),
            title: "Dom Casmurro".to_string(),
            available: 3,
            requested: 5,
        };

        assert_eq!(soft.code(), ErrorCode::StockExceeded);
        assert_eq!(hard.code(), ErrorCode::InsufficientStock);

        let json = serde_json::to_value(&hard).unwrap();
        assert_eq!(json["code"], "INSUFFICIENT_STOCK");
    }

    #[test]
    fn test_db_error_mapping() {
        let err: EngineError = DbError::not_found("Reservation", "r-1").into();
        assert!(matches!(err, EngineError::NotFound { .. }));

        let err: EngineError = DbError::write_conflict("Book", "b-1").into();
        assert_eq!(err.code(), ErrorCode::Conflict);

        // Query details are sanitized away
        let err: EngineError = DbError::QueryFailed("UNIQUE constraint puked".to_string()).into();
        assert_eq!(err.to_string(), "Database operation failed");
        assert_eq!(err.code(), ErrorCode::PersistenceError);
    }

    #[test]
    fn test_core_error_mapping() {
        let err: EngineError = CoreError::StockExceeded {
            book_id: "b-1".to_string(),
            available: 2,
        }
        .into();
        assert!(matches!(
            err,
            EngineError::StockExceeded { available: 2, .. }
        ));

        // The inner validation message comes through without a wrapper prefix
        let err: EngineError = CoreError::Validation(ValidationError::Required {
            field: "customer name".to_string(),
        })
        .into();
        assert_eq!(err.to_string(), "customer name is required");

        let err: EngineError = CoreError::NotInCart("b-9".to_string()).into();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = EngineError::InvalidTransition {
            from: ReservationStatus::Completed,
            to: ReservationStatus::Pending,
        };
        assert_eq!(
            err.to_string(),
            "Reservation cannot change status from completed to pending"
        );
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INVALID_TRANSITION");
    }
}
