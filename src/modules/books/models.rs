use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::BookError;

/// A persisted book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Storage-assigned identifier
    pub id: i64,
    pub author: String,
    /// Title of the book, may be absent
    pub title: Option<String>,
    pub publisher: String,
}

/// Request model for creating a new book.
///
/// Absent `author` and `publisher` default to the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBook {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub publisher: String,
}

/// Request model for replacing a book's title.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTitle {
    #[serde(default)]
    pub title: String,
}

/// Identifier taken from a request path.
///
/// Only constructible from a non-empty integer string, so a `BookId` in hand
/// means the presence check already passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BookId(i64);

impl BookId {
    pub fn parse(raw: &str) -> Result<Self, BookError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(BookError::MissingId);
        }
        raw.parse::<i64>()
            .map(Self)
            .map_err(|_| BookError::InvalidId(raw.to_string()))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for BookId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Serialize)]
pub struct BookEnvelope {
    pub book: Book,
}

#[derive(Debug, Serialize)]
pub struct BooksEnvelope {
    pub books: Vec<Book>,
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub msg: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_ids() {
        assert_eq!(BookId::parse("42").unwrap().get(), 42);
        assert_eq!(BookId::parse(" 7 ").unwrap().get(), 7);
    }

    #[test]
    fn rejects_blank_ids() {
        assert!(matches!(BookId::parse(""), Err(BookError::MissingId)));
        assert!(matches!(BookId::parse("   "), Err(BookError::MissingId)));
    }

    #[test]
    fn rejects_non_numeric_ids() {
        match BookId::parse("abc") {
            Err(BookError::InvalidId(raw)) => assert_eq!(raw, "abc"),
            other => panic!("expected InvalidId, got {other:?}"),
        }
    }

    #[test]
    fn create_book_title_is_optional() {
        let body: CreateBook =
            serde_json::from_str(r#"{"author": "A", "publisher": "P"}"#).unwrap();
        assert_eq!(body.title, None);
    }

    #[test]
    fn absent_body_fields_default_to_empty() {
        let body: CreateBook = serde_json::from_str(r#"{"title": "only title"}"#).unwrap();
        assert_eq!(body.author, "");
        assert_eq!(body.publisher, "");
        assert_eq!(body.title.as_deref(), Some("only title"));

        let update: UpdateTitle = serde_json::from_str("{}").unwrap();
        assert_eq!(update.title, "");
    }

    #[test]
    fn book_serializes_null_title() {
        let book = Book {
            id: 1,
            author: "A".to_string(),
            title: None,
            publisher: "P".to_string(),
        };
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"id": 1, "author": "A", "title": null, "publisher": "P"})
        );
    }
}
