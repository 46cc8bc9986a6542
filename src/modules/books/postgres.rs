use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::error::BookError;
use super::models::{Book, BookId, CreateBook};
use super::store::{BookStore, LIST_FILTERED_MIN_ID};

#[derive(Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn create(&self, book: CreateBook) -> Result<Book, BookError> {
        let row = sqlx::query(
            r#"
            INSERT INTO books (author, title, publisher)
            VALUES ($1, $2, $3)
            RETURNING id, author, title, publisher
            "#,
        )
        .bind(book.author)
        .bind(book.title)
        .bind(book.publisher)
        .fetch_one(&self.pool)
        .await?;

        Ok(row_to_book(&row)?)
    }

    async fn delete_by_id(&self, id: BookId) -> Result<(), BookError> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(BookError::NotFound(id));
        }
        Ok(())
    }

    async fn get_by_id(&self, id: BookId) -> Result<Book, BookError> {
        let maybe_row = sqlx::query(
            r#"
            SELECT id, author, title, publisher
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        match maybe_row {
            Some(row) => Ok(row_to_book(&row)?),
            None => Err(BookError::NotFound(id)),
        }
    }

    async fn list_all(&self) -> Result<Vec<Book>, BookError> {
        let rows = sqlx::query(
            r#"
            SELECT id, author, title, publisher
            FROM books
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows_to_books(&rows)
    }

    async fn update_title(&self, id: BookId, title: String) -> Result<Book, BookError> {
        let maybe_row = sqlx::query(
            r#"
            UPDATE books
            SET title = $1
            WHERE id = $2
            RETURNING id, author, title, publisher
            "#,
        )
        .bind(title)
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        match maybe_row {
            Some(row) => Ok(row_to_book(&row)?),
            None => Err(BookError::NotFound(id)),
        }
    }

    async fn list_filtered(&self) -> Result<Vec<Book>, BookError> {
        let rows = sqlx::query(
            r#"
            SELECT id, author, title, publisher
            FROM books
            WHERE id > $1
            ORDER BY id DESC
            "#,
        )
        .bind(LIST_FILTERED_MIN_ID)
        .fetch_all(&self.pool)
        .await?;

        rows_to_books(&rows)
    }
}

fn row_to_book(row: &PgRow) -> Result<Book, sqlx::Error> {
    Ok(Book {
        id: row.try_get("id")?,
        author: row.try_get("author")?,
        title: row.try_get("title")?,
        publisher: row.try_get("publisher")?,
    })
}

fn rows_to_books(rows: &[PgRow]) -> Result<Vec<Book>, BookError> {
    rows.iter()
        .map(|row| row_to_book(row).map_err(BookError::from))
        .collect()
}
