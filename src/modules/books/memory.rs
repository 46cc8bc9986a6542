use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::BookError;
use super::models::{Book, BookId, CreateBook};
use super::store::{BookStore, LIST_FILTERED_MIN_ID};

#[derive(Default)]
struct State {
    last_id: i64,
    books: BTreeMap<i64, Book>,
}

/// Process-local store with the same semantics as the PostgreSQL one.
#[derive(Default)]
pub struct InMemoryBookStore {
    state: RwLock<State>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn create(&self, book: CreateBook) -> Result<Book, BookError> {
        let mut state = self.state.write().await;
        state.last_id += 1;

        let created = Book {
            id: state.last_id,
            author: book.author,
            title: book.title,
            publisher: book.publisher,
        };
        state.books.insert(created.id, created.clone());

        Ok(created)
    }

    async fn delete_by_id(&self, id: BookId) -> Result<(), BookError> {
        self.state
            .write()
            .await
            .books
            .remove(&id.get())
            .map(|_| ())
            .ok_or(BookError::NotFound(id))
    }

    async fn get_by_id(&self, id: BookId) -> Result<Book, BookError> {
        self.state
            .read()
            .await
            .books
            .get(&id.get())
            .cloned()
            .ok_or(BookError::NotFound(id))
    }

    async fn list_all(&self) -> Result<Vec<Book>, BookError> {
        Ok(self.state.read().await.books.values().cloned().collect())
    }

    async fn update_title(&self, id: BookId, title: String) -> Result<Book, BookError> {
        let mut state = self.state.write().await;
        let Some(book) = state.books.get_mut(&id.get()) else {
            return Err(BookError::NotFound(id));
        };

        book.title = Some(title);
        Ok(book.clone())
    }

    async fn list_filtered(&self) -> Result<Vec<Book>, BookError> {
        Ok(self
            .state
            .read()
            .await
            .books
            .range(LIST_FILTERED_MIN_ID + 1..)
            .rev()
            .map(|(_, book)| book.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_book(n: usize) -> CreateBook {
        CreateBook {
            author: format!("author-{n}"),
            title: Some(format!("title-{n}")),
            publisher: format!("publisher-{n}"),
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially_and_never_reused() {
        let store = InMemoryBookStore::new();
        let first = store.create(new_book(1)).await.unwrap();
        let second = store.create(new_book(2)).await.unwrap();
        store.delete_by_id(BookId::from(second.id)).await.unwrap();
        let third = store.create(new_book(3)).await.unwrap();

        assert_eq!((first.id, second.id, third.id), (1, 2, 3));
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let store = InMemoryBookStore::new();
        let id = BookId::from(99);

        assert!(matches!(store.get_by_id(id).await, Err(BookError::NotFound(_))));
        assert!(matches!(store.delete_by_id(id).await, Err(BookError::NotFound(_))));
        assert!(matches!(
            store.update_title(id, "x".into()).await,
            Err(BookError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_title_leaves_other_fields() {
        let store = InMemoryBookStore::new();
        let created = store.create(new_book(1)).await.unwrap();

        let updated = store
            .update_title(BookId::from(created.id), "New".into())
            .await
            .unwrap();

        assert_eq!(updated.title.as_deref(), Some("New"));
        assert_eq!(updated.author, created.author);
        assert_eq!(updated.publisher, created.publisher);
        assert_eq!(store.get_by_id(BookId::from(created.id)).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn list_filtered_returns_ids_above_five_descending() {
        let store = InMemoryBookStore::new();
        for n in 1..=8 {
            store.create(new_book(n)).await.unwrap();
        }
        store.delete_by_id(BookId::from(7)).await.unwrap();

        let ids: Vec<i64> = store
            .list_filtered()
            .await
            .unwrap()
            .into_iter()
            .map(|book| book.id)
            .collect();
        assert_eq!(ids, vec![8, 6]);

        let all: Vec<i64> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|book| book.id)
            .collect();
        assert_eq!(all, vec![1, 2, 3, 4, 5, 6, 8]);
    }
}
