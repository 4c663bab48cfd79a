//! Book listing queries.
//!
//! A [`SearchQuery`] always starts with [`Filter::Active`], so hidden
//! books never appear in a listing.

use crate::search::Filter;
use serde::{Deserialize, Serialize};

/// Tables a book search reads from.
pub const BOOK_SOURCE: &str = "books b \
    LEFT JOIN authors a ON a.id = b.author_id \
    LEFT JOIN categories c ON c.id = b.category_id \
    LEFT JOIN publishers p ON p.id = b.publisher_id";

/// Default page size for book listings.
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Largest accepted page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Listing order. Every variant ends in a stable tiebreaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    #[default]
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
    TitleAsc,
    TitleDesc,
    /// Highest average first, more reviews breaking ties.
    Rating,
    /// Most viewed first.
    Popularity,
}

impl SortOption {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOption::Newest => "b.created_at DESC, b.id DESC",
            SortOption::Oldest => "b.created_at ASC, b.id ASC",
            SortOption::PriceAsc => "b.price_cents ASC, b.id ASC",
            SortOption::PriceDesc => "b.price_cents DESC, b.id DESC",
            SortOption::TitleAsc => "b.title COLLATE NOCASE ASC, b.id ASC",
            SortOption::TitleDesc => "b.title COLLATE NOCASE DESC, b.id DESC",
            SortOption::Rating => "b.rating DESC, b.review_count DESC, b.id DESC",
            SortOption::Popularity => "b.view_count DESC, b.id DESC",
        }
    }

    /// Parse a sort parameter. Accepts the option names as well as
    /// field-style orderings such as `-price`.
    pub fn from_param(param: &str) -> Option<Self> {
        match param {
            "newest" | "-created_at" => Some(SortOption::Newest),
            "oldest" | "created_at" => Some(SortOption::Oldest),
            "price_asc" | "price" => Some(SortOption::PriceAsc),
            "price_desc" | "-price" => Some(SortOption::PriceDesc),
            "title_asc" | "title" => Some(SortOption::TitleAsc),
            "title_desc" | "-title" => Some(SortOption::TitleDesc),
            "rating" | "-rating" => Some(SortOption::Rating),
            "popularity" | "-view_count" => Some(SortOption::Popularity),
            _ => None,
        }
    }
}

/// Filters, order and page for one book listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchQuery {
    /// Trimmed search text, also present as a [`Filter::Text`].
    pub query: Option<String>,
    pub filters: Vec<Filter>,
    pub sort: SortOption,
    /// 1-based.
    pub page: i64,
    pub per_page: i64,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchQuery {
    pub fn new() -> Self {
        Self {
            query: None,
            filters: vec![Filter::Active],
            sort: SortOption::Newest,
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }

    /// Match `text` against titles, descriptions, author names and ISBNs.
    /// Blank text is ignored.
    pub fn with_query(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        let text = text.trim();
        if !text.is_empty() {
            self.query = Some(text.to_string());
            self.filters.push(Filter::Text(text.to_string()));
        }
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Out-of-range values are clamped.
    pub fn with_pagination(mut self, page: i64, per_page: i64) -> Self {
        self.page = page.max(1);
        self.per_page = per_page.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    /// The filters ANDed together, with their bind values in order.
    pub fn build_where_clause(&self) -> (String, Vec<String>) {
        let mut params = Vec::new();
        let clauses: Vec<String> = self
            .filters
            .iter()
            .map(Filter::to_sql)
            .filter(|(clause, _)| !clause.is_empty())
            .map(|(clause, values)| {
                params.extend(values);
                format!("({})", clause)
            })
            .collect();

        if clauses.is_empty() {
            ("1=1".to_string(), params)
        } else {
            (clauses.join(" AND "), params)
        }
    }

    /// One page of `columns` from [`BOOK_SOURCE`].
    pub fn build_sql(&self, columns: &str) -> (String, Vec<String>) {
        let (conditions, params) = self.build_where_clause();
        let sql = format!(
            "SELECT {columns} FROM {BOOK_SOURCE} WHERE {conditions} ORDER BY {} LIMIT {} OFFSET {}",
            self.sort.to_sql(),
            self.per_page,
            self.offset()
        );
        (sql, params)
    }

    /// Total matches for the same filters, ignoring the page.
    pub fn build_count_sql(&self) -> (String, Vec<String>) {
        let (conditions, params) = self.build_where_clause();
        (
            format!("SELECT COUNT(*) AS count FROM {BOOK_SOURCE} WHERE {conditions}"),
            params,
        )
    }
}
