//! Repository layer for book persistence

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::book::{Book, BookData},
};

pub use memory::MemoryBookRepository;
pub use postgres::PgBookRepository;

/// Storage operations on the book catalog.
///
/// Implementations enforce ISBN uniqueness (reporting
/// [`AppError::Conflict`](crate::error::AppError::Conflict)) and never reuse
/// an id once assigned.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books, newest release first, ties by ascending id
    async fn list(&self) -> AppResult<Vec<Book>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>>;

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>>;

    /// Insert a new book, available by default
    async fn insert(&self, data: &BookData) -> AppResult<Book>;

    /// Replace name, author, isbn and release date. `None` if no such id.
    async fn update(&self, id: i32, data: &BookData) -> AppResult<Option<Book>>;

    /// Atomically flip availability. `None` if no such id.
    async fn toggle_availability(&self, id: i32) -> AppResult<Option<Book>>;

    /// Returns `true` if a book was removed
    async fn delete(&self, id: i32) -> AppResult<bool>;

    /// Remove every book, returning how many were removed
    async fn clear(&self) -> AppResult<u64>;

    /// Check that the underlying store is reachable
    async fn ping(&self) -> AppResult<()>;
}

/// Shared handle on the configured repository
pub type Repository = Arc<dyn BookRepository>;
