//! Book catalog endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookInput, BookSearchQuery},
    AppState,
};

use super::{BookId, ValidatedJson};

/// List envelope
#[derive(Debug, Serialize)]
pub struct BookList {
    pub data: Vec<Book>,
}

/// Confirmation returned by delete
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /books
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<BookList>> {
    let data = state.services.books.list().await?;
    Ok(Json(BookList { data }))
}

/// GET /books/search?isbn=
pub async fn search_book(
    State(state): State<AppState>,
    query: Result<Query<BookSearchQuery>, axum::extract::rejection::QueryRejection>,
) -> AppResult<Json<Book>> {
    let Query(query) =
        query.map_err(|rejection| AppError::invalid_field("isbn", rejection.body_text()))?;
    query.validate()?;

    let isbn = query.isbn.unwrap_or_default();
    let book = state.services.books.get_by_isbn(&isbn).await?;
    Ok(Json(book))
}

/// GET /books/:id
pub async fn get_book(State(state): State<AppState>, BookId(id): BookId) -> AppResult<Json<Book>> {
    let book = state.services.books.get_by_id(id).await?;
    Ok(Json(book))
}

/// POST /books
pub async fn create_book(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<BookInput>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.services.books.create(input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// PUT /books/:id
pub async fn update_book(
    State(state): State<AppState>,
    BookId(id): BookId,
    ValidatedJson(input): ValidatedJson<BookInput>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.update(id, input).await?;
    Ok(Json(book))
}

/// PATCH /books/:id. Any request body is ignored.
pub async fn toggle_availability(
    State(state): State<AppState>,
    BookId(id): BookId,
) -> AppResult<Json<Book>> {
    let book = state.services.books.toggle_availability(id).await?;
    Ok(Json(book))
}

/// DELETE /books/:id
pub async fn delete_book(
    State(state): State<AppState>,
    BookId(id): BookId,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.delete(id).await?;
    Ok(Json(MessageResponse {
        message: "Book deleted successfully".to_string(),
    }))
}
