use shelf_http::AppError;
use thiserror::Error;

use super::models::BookId;

#[derive(Debug, Error)]
pub enum BookError {
    #[error("id is required")]
    MissingId,

    #[error("invalid id '{0}'")]
    InvalidId(String),

    #[error("book {0} not found")]
    NotFound(BookId),

    /// Driver error, surfaced with its original text.
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::MissingId | BookError::InvalidId(_) => AppError::bad_request(err.to_string()),
            BookError::NotFound(_) => AppError::not_found(err.to_string()),
            BookError::Storage(source) => AppError::storage(source.to_string()),
        }
    }
}
