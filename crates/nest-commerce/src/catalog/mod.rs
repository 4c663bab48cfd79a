//! Catalog module.
//!
//! Contains types for books, authors, categories, and publishers.

mod author;
mod book;
mod category;
mod publisher;
mod slug;

pub use author::{Author, AuthorDraft};
pub use book::{Book, BookDraft, Condition, Language};
pub use category::{Category, CategoryDraft};
pub use publisher::{Publisher, PublisherDraft};
pub use slug::{slugify, unique_slug};
