//! # Book Repository
//!
//! Database operations for the catalog and the stock ledger.
//!
//! ## Key Operations
//! - Catalog CRUD (insert, get, list, update)
//! - Stock decrements through a compare-and-swap loop
//!
//! ## Stock CAS Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 How a Stock Decrement Commits                           │
//! │                                                                         │
//! │  decrement_stock("b-1", 3)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT stock, version FROM books WHERE id = 'b-1'                     │
//! │       │              (stock = 10, version = 7)                          │
//! │       ▼                                                                 │
//! │  new_stock = max(0, 10 - 3) = 7        ← clamped, never negative       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE books SET stock = 7, version = version + 1                     │
//! │  WHERE id = 'b-1' AND version = 7      ← fails if someone else wrote   │
//! │       │                                                                 │
//! │       ├── 1 row affected  → done, return 7                             │
//! │       └── 0 rows affected → another writer won, re-read and retry      │
//! │                                                                         │
//! │  Bounded retries; exhausting them surfaces WriteConflict instead of    │
//! │  silently losing an update.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use folio_core::Book;

/// Retry budget for the stock compare-and-swap loop.
const MAX_CAS_ATTEMPTS: u32 = 5;

/// Repository for book database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = BookRepository::new(pool);
///
/// // Catalog reads
/// let books = repo.list().await?;
/// let book = repo.get_by_id("uuid-here").await?;
///
/// // Stock ledger
/// let remaining = repo.decrement_stock("uuid-here", 2).await?;
/// ```
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    /// Creates a new BookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    /// Lists active books, newest first.
    ///
    /// ## Usage
    /// The storefront catalog view. Inactive books are hidden here but stay
    /// readable through [`get_by_id`](Self::get_by_id) for historical rows.
    pub async fn list(&self) -> DbResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, price_cents, stock, category,
                   description, cover_url, is_active, created_at, updated_at, version
            FROM books
            WHERE is_active = 1
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Lists every book row, active or not, newest first.
    ///
    /// ## Usage
    /// Sales summaries need category labels for books that were deactivated
    /// after the sale was recorded.
    pub async fn list_all(&self) -> DbResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, price_cents, stock, category,
                   description, cover_url, is_active, created_at, updated_at, version
            FROM books
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Gets a book by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Book))` - Book found
    /// * `Ok(None)` - Book not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, price_cents, stock, category,
                   description, cover_url, is_active, created_at, updated_at, version
            FROM books
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Inserts a new book.
    ///
    /// ## Arguments
    /// * `book` - Book to insert (id should be generated beforehand)
    pub async fn insert(&self, book: &Book) -> DbResult<Book> {
        debug!(title = %book.title, "Inserting book");

        sqlx::query(
            r#"
            INSERT INTO books (
                id, title, author, price_cents, stock, category,
                description, cover_url, is_active, created_at, updated_at, version
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.price_cents)
        .bind(book.stock)
        .bind(&book.category)
        .bind(&book.description)
        .bind(&book.cover_url)
        .bind(book.is_active)
        .bind(book.created_at)
        .bind(book.updated_at)
        .bind(book.version)
        .execute(&self.pool)
        .await?;

        Ok(book.clone())
    }

    /// Updates a book's catalog fields.
    ///
    /// Stock is deliberately absent from the column list: it only moves
    /// through [`decrement_stock`](Self::decrement_stock), so catalog edits
    /// can never resurrect copies a concurrent sale just removed.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Book doesn't exist
    pub async fn update(&self, book: &Book) -> DbResult<()> {
        debug!(id = %book.id, "Updating book");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE books SET
                title = ?2,
                author = ?3,
                price_cents = ?4,
                category = ?5,
                description = ?6,
                cover_url = ?7,
                is_active = ?8,
                updated_at = ?9,
                version = version + 1
            WHERE id = ?1
            "#,
        )
        .bind(&book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.price_cents)
        .bind(&book.category)
        .bind(&book.description)
        .bind(&book.cover_url)
        .bind(book.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Book", &book.id));
        }

        Ok(())
    }

    /// Decrements a book's stock, clamped at zero.
    ///
    /// ## Clamp Semantics
    /// `new_stock = max(0, stock - quantity)`. Decrementing past zero lands
    /// on the floor and is not an error; callers that must report
    /// insufficiency pre-check the stock before calling.
    ///
    /// ## Concurrency
    /// Read `(stock, version)`, compute the clamped value, then write with
    /// `WHERE version = <read value>`. Zero rows affected means another
    /// writer committed in between; re-read and retry up to
    /// [`MAX_CAS_ATTEMPTS`] times, then surface `WriteConflict`.
    ///
    /// ## Returns
    /// * `Ok(new_stock)` - The stock level after the decrement
    /// * `Err(DbError::NotFound)` - Book doesn't exist
    /// * `Err(DbError::WriteConflict)` - Retry budget exhausted
    pub async fn decrement_stock(&self, id: &str, quantity: i64) -> DbResult<i64> {
        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let row = sqlx::query_as::<_, (i64, i64)>(
                "SELECT stock, version FROM books WHERE id = ?1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            let (stock, version) = match row {
                Some(pair) => pair,
                None => return Err(DbError::not_found("Book", id)),
            };

            let new_stock = (stock - quantity).max(0);
            let now = Utc::now();

            let result = sqlx::query(
                r#"
                UPDATE books
                SET stock = ?2, version = version + 1, updated_at = ?3
                WHERE id = ?1 AND version = ?4
                "#,
            )
            .bind(id)
            .bind(new_stock)
            .bind(now)
            .bind(version)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() > 0 {
                debug!(
                    id = %id,
                    from = stock,
                    to = new_stock,
                    attempt,
                    "Stock decremented"
                );
                return Ok(new_stock);
            }

            // Another writer bumped the version between our read and write
            warn!(id = %id, attempt, "Stock CAS write lost the race, retrying");
        }

        Err(DbError::write_conflict("Book", id))
    }

    /// Counts active books (for diagnostics and the seed guard).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new book ID.
///
/// ## Usage
/// ```rust,ignore
/// let id = generate_book_id();
/// let book = Book { id, ... };
/// ```
pub fn generate_book_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
