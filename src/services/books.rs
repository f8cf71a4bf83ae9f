//! Book catalog service

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookData, BookInput},
    repository::Repository,
};

#[derive(Clone)]
pub struct BookService {
    repository: Repository,
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Book {} not found", id))
}

impl BookService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All books, newest release first
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn get_by_isbn(&self, isbn: &str) -> AppResult<Book> {
        self.repository
            .find_by_isbn(isbn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No book with ISBN {}", isbn)))
    }

    pub async fn create(&self, input: BookInput) -> AppResult<Book> {
        let data = BookData::try_from(input)?;
        let book = self.repository.insert(&data).await?;
        tracing::info!(id = book.id, isbn = %book.isbn, "Book created");
        Ok(book)
    }

    /// Replace every editable field of an existing book
    pub async fn update(&self, id: i32, input: BookInput) -> AppResult<Book> {
        let data = BookData::try_from(input)?;
        let book = self
            .repository
            .update(id, &data)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(id, "Book updated");
        Ok(book)
    }

    /// Flip availability; calling twice restores the original value
    pub async fn toggle_availability(&self, id: i32) -> AppResult<Book> {
        let book = self
            .repository
            .toggle_availability(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(id, availability = book.availability, "Book availability toggled");
        Ok(book)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.repository.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(id, "Book deleted");
        Ok(())
    }

    /// Remove the whole catalog
    pub async fn clear(&self) -> AppResult<u64> {
        let removed = self.repository.clear().await?;
        tracing::warn!(removed, "Book catalog cleared");
        Ok(removed)
    }

    /// Check that the store answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
