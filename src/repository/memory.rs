//! In-memory book repository

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::BookRepository;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookData},
};

#[derive(Debug, Default)]
struct State {
    /// Last id handed out; ids are never reused, even after deletes
    last_id: i32,
    books: BTreeMap<i32, Book>,
}

impl State {
    fn isbn_taken(&self, isbn: &str, except: Option<i32>) -> bool {
        self.books
            .values()
            .any(|book| book.isbn == isbn && Some(book.id) != except)
    }
}

/// Process-local implementation of [`BookRepository`]
#[derive(Debug, Clone, Default)]
pub struct MemoryBookRepository {
    state: Arc<RwLock<State>>,
}

impl MemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn conflict(isbn: &str) -> AppError {
    AppError::Conflict(format!("A book with ISBN {} already exists", isbn))
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn list(&self) -> AppResult<Vec<Book>> {
        let state = self.state.read().await;
        let mut books: Vec<Book> = state.books.values().cloned().collect();
        books.sort_by(|a, b| {
            b.release_date
                .cmp(&a.release_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(books)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        Ok(self.state.read().await.books.get(&id).cloned())
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let state = self.state.read().await;
        Ok(state.books.values().find(|book| book.isbn == isbn).cloned())
    }

    async fn insert(&self, data: &BookData) -> AppResult<Book> {
        let mut state = self.state.write().await;
        if state.isbn_taken(&data.isbn, None) {
            return Err(conflict(&data.isbn));
        }

        let id = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| AppError::Internal("book id space exhausted".to_string()))?;
        state.last_id = id;

        let now = Utc::now();
        let book = Book {
            id,
            name: data.name.clone(),
            author: data.author.clone(),
            isbn: data.isbn.clone(),
            release_date: data.release_date,
            availability: true,
            created_at: now,
            updated_at: now,
        };
        state.books.insert(id, book.clone());
        Ok(book)
    }

    async fn update(&self, id: i32, data: &BookData) -> AppResult<Option<Book>> {
        let mut state = self.state.write().await;
        if !state.books.contains_key(&id) {
            return Ok(None);
        }
        if state.isbn_taken(&data.isbn, Some(id)) {
            return Err(conflict(&data.isbn));
        }

        Ok(state.books.get_mut(&id).map(|book| {
            book.name = data.name.clone();
            book.author = data.author.clone();
            book.isbn = data.isbn.clone();
            book.release_date = data.release_date;
            book.updated_at = Utc::now();
            book.clone()
        }))
    }

    async fn toggle_availability(&self, id: i32) -> AppResult<Option<Book>> {
        let mut state = self.state.write().await;
        Ok(state.books.get_mut(&id).map(|book| {
            book.availability = !book.availability;
            book.updated_at = Utc::now();
            book.clone()
        }))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.state.write().await.books.remove(&id).is_some())
    }

    async fn clear(&self) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let removed = state.books.len() as u64;
        state.books.clear();
        Ok(removed)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
