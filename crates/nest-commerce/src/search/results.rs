//! Paged listing output.

use serde::{Deserialize, Serialize};

/// Where a page sits in the full result set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    /// Matching books across all pages.
    pub total: i64,
    /// Never less than 1, so an empty listing still has a page.
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let per_page = per_page.max(1);
        let total_pages = ((total.max(0) + per_page - 1) / per_page).max(1);
        Self {
            page,
            per_page,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

/// A page of listing rows plus its [`Pagination`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResults<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> SearchResults<T> {
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self { items, pagination }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_page() {
        let p = Pagination::new(2, 20, 45);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next && p.has_prev);
    }

    #[test]
    fn test_final_page() {
        let p = Pagination::new(3, 20, 45);
        assert!(!p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn test_no_matches_still_one_page() {
        let p = Pagination::new(1, 20, 0);
        assert_eq!(p.total_pages, 1);
        assert!(!p.has_next && !p.has_prev);

        let results: SearchResults<i64> = SearchResults::new(Vec::new(), p);
        assert!(results.is_empty());
    }
}
