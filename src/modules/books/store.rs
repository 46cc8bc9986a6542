use std::sync::Arc;

use async_trait::async_trait;

use super::error::BookError;
use super::models::{Book, BookId, CreateBook};

/// Books with an id above this value are returned by [`BookStore::list_filtered`].
pub const LIST_FILTERED_MIN_ID: i64 = 5;

pub type SharedBookStore = Arc<dyn BookStore>;

/// Persistence gateway for books.
///
/// Every method issues a single storage statement; nothing spans calls.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn create(&self, book: CreateBook) -> Result<Book, BookError>;

    /// Fails with [`BookError::NotFound`] when no row was removed.
    async fn delete_by_id(&self, id: BookId) -> Result<(), BookError>;

    async fn get_by_id(&self, id: BookId) -> Result<Book, BookError>;

    /// All books in insertion (ascending id) order.
    async fn list_all(&self) -> Result<Vec<Book>, BookError>;

    /// Replace the title in one conditional write and return the updated row.
    async fn update_title(&self, id: BookId, title: String) -> Result<Book, BookError>;

    /// Books with id greater than [`LIST_FILTERED_MIN_ID`], highest id first.
    async fn list_filtered(&self) -> Result<Vec<Book>, BookError>;
}
