//! Data models for Book Tracker

pub mod book;

pub use book::{Book, BookData, BookInput, BookSearchQuery};
