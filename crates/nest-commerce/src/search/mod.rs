//! Search module.
//!
//! Contains types for book filters, sorting, and pagination.

mod filter;
mod query;
mod results;

pub use filter::Filter;
pub use query::{SearchQuery, SortOption, BOOK_SOURCE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use results::{Pagination, SearchResults};
