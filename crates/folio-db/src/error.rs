//! # Database Error Types
//!
//! [`DbError`] wraps every failure the persistence layer can produce.
//! Raw `sqlx::Error` values never leave this crate; the `From` impl at
//! the bottom sorts them into variants the engine can match on, and the
//! engine in turn folds `DbError` into its own error type before
//! anything reaches a caller.

use thiserror::Error;

/// Failures out of the persistence layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// No row answered to the given id.
    ///
    /// Also raised when a guarded UPDATE matches nothing, which is how
    /// stale-status and stale-version writes report themselves.
    #[error("{entity} not found: {id}")]
    NotFound {
        entity: String,
        id: String,
    },

    /// A UNIQUE index rejected the write (duplicate reservation number,
    /// duplicate primary key).
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation {
        field: String,
        value: String,
    },

    /// A child row pointed at a parent that does not exist, such as an
    /// item without its reservation or a sale without its book.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation {
        message: String,
    },

    /// A compare-and-swap write lost every retry to concurrent writers.
    ///
    /// Stock decrements raise this when the version column keeps moving
    /// under them past the retry budget.
    #[error("Write conflict on {entity} {id}: too many concurrent updates")]
    WriteConflict {
        entity: String,
        id: String,
    },

    /// The pool could not be built or the file could not be opened.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A migration refused to apply.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Statement execution failed for a non-constraint reason.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Every pooled connection was busy for the whole acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Anything sqlx reports that fits none of the above.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// A [`DbError::NotFound`] for the given entity and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// A [`DbError::UniqueViolation`] for the given column.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a WriteConflict error.
    pub fn write_conflict(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::WriteConflict {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Sorts a SQLite engine error by its message text.
///
/// SQLite reports constraint failures as strings
/// ("UNIQUE constraint failed: <table>.<column>",
/// "FOREIGN KEY constraint failed"), so classification is a substring
/// check rather than a code match.
fn classify_sqlite_error(msg: &str) -> DbError {
    if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
        return DbError::UniqueViolation {
            field: field.to_string(),
            value: "unknown".to_string(),
        };
    }

    if msg.contains("FOREIGN KEY constraint failed") {
        return DbError::ForeignKeyViolation {
            message: msg.to_string(),
        };
    }

    DbError::QueryFailed(msg.to_string())
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => classify_sqlite_error(db_err.message()),

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Shorthand for results that fail with [`DbError`].
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================
