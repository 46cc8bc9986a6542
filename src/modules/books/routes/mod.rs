//! HTTP handlers for the books module. Each handler makes exactly one store call.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};
use shelf_http::AppError;

use super::error::BookError;
use super::models::{
    Book, BookEnvelope, BookId, BooksEnvelope, CreateBook, MessageBody, UpdateTitle,
};
use super::store::SharedBookStore;

type ApiResult<T> = Result<T, AppError>;

/// Build the books router; paths are relative to the API base path.
///
/// The trailing-slash variants of the id routes answer "id is required".
pub fn router(store: SharedBookStore) -> Router {
    Router::new()
        .route("/create_books", post(create_book))
        .route("/delete_books/{id}", delete(delete_book))
        .route("/delete_books/", delete(missing_id))
        .route("/get_books/{id}", get(get_book))
        .route("/get_books/", get(missing_id))
        .route("/books", get(list_books))
        .route("/update_title/{id}", patch(update_title))
        .route("/update_title/", patch(missing_id))
        .route("/get_books_by_id", get(list_filtered_books))
        .route("/health", get(health_check))
        .with_state(store)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn missing_id() -> AppError {
    BookError::MissingId.into()
}

async fn create_book(
    State(store): State<SharedBookStore>,
    payload: Result<Json<CreateBook>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Book>)> {
    let Json(request) =
        payload.map_err(|rejection| AppError::validation(vec![], rejection.body_text()))?;

    let book = store.create(request).await?;
    tracing::info!(book_id = book.id, "book created");

    Ok((StatusCode::CREATED, Json(book)))
}

async fn delete_book(
    State(store): State<SharedBookStore>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageBody>> {
    let id = BookId::parse(&id)?;

    store.delete_by_id(id).await?;
    tracing::info!(book_id = %id, "book deleted");

    Ok(Json(MessageBody {
        msg: "Book deleted successfully",
    }))
}

async fn get_book(
    State(store): State<SharedBookStore>,
    Path(id): Path<String>,
) -> ApiResult<Json<BookEnvelope>> {
    let id = BookId::parse(&id)?;
    let book = store.get_by_id(id).await?;
    Ok(Json(BookEnvelope { book }))
}

async fn list_books(State(store): State<SharedBookStore>) -> ApiResult<Json<BooksEnvelope>> {
    let books = store.list_all().await?;
    Ok(Json(BooksEnvelope { books }))
}

async fn update_title(
    State(store): State<SharedBookStore>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTitle>, JsonRejection>,
) -> ApiResult<Json<BookEnvelope>> {
    let id = BookId::parse(&id)?;
    let Json(request) =
        payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    let book = store.update_title(id, request.title).await?;
    tracing::info!(book_id = %id, "book title updated");

    Ok(Json(BookEnvelope { book }))
}

async fn list_filtered_books(
    State(store): State<SharedBookStore>,
) -> ApiResult<Json<BooksEnvelope>> {
    let books = store.list_filtered().await?;
    Ok(Json(BooksEnvelope { books }))
}
