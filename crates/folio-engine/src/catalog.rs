//! # Catalog Queries
//!
//! Read-side operations over the book catalog. Catalog writes happen
//! elsewhere (seeding, back office); the engine only ever reads here.

use tracing::{debug, warn};

use folio_core::types::Book;

use crate::error::{EngineError, EngineResult};
use crate::Engine;

impl Engine {
    /// Lists the active catalog, newest first.
    pub async fn list_books(&self) -> EngineResult<Vec<Book>> {
        debug!("list_books");
        Ok(self.db.books().list().await?)
    }

    /// Gets a single book by ID.
    pub async fn get_book(&self, id: &str) -> EngineResult<Book> {
        debug!(id = %id, "get_book");

        self.db
            .books()
            .get_by_id(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Book", id))
    }

    /// Picks the book promoted on the landing view.
    ///
    /// ## Selection Order
    /// 1. The configured `book_of_the_day_id`, when it is in the active
    ///    catalog (staff may promote a sold-out title on purpose)
    /// 2. The newest active book with stock
    /// 3. The newest active book
    /// 4. `None` on an empty catalog
    pub async fn book_of_the_day(&self) -> EngineResult<Option<Book>> {
        debug!("book_of_the_day");

        let books = self.db.books().list().await?;

        if let Some(id) = &self.config.book_of_the_day_id {
            if let Some(book) = books.iter().find(|b| &b.id == id) {
                return Ok(Some(book.clone()));
            }
            warn!(book_id = %id, "Configured book of the day is not in the active catalog");
        }

        Ok(books
            .iter()
            .find(|b| b.in_stock())
            .or_else(|| books.first())
            .cloned())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
