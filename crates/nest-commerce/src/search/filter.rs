//! Search filter types.

use crate::catalog::Language;
use crate::ids::{AuthorId, BookId, CategoryId, PublisherId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A book search filter.
///
/// Column references use the aliases of [`BOOK_SOURCE`](crate::search::BOOK_SOURCE):
/// `b` for books and `a` for authors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Filter {
    /// Only books shown on the storefront.
    Active,
    /// Filter by multiple categories (OR).
    Categories(Vec<CategoryId>),
    /// Filter by multiple authors (OR).
    Authors(Vec<AuthorId>),
    /// Filter by publisher.
    Publisher(PublisherId),
    /// Filter by printed language (OR).
    Languages(Vec<Language>),
    /// Filter by list price range.
    PriceRange {
        min: Option<Money>,
        max: Option<Money>,
    },
    /// Filter by minimum rating.
    Rating { min: f64 },
    /// Only show in-stock books.
    InStock,
    /// Only featured books.
    Featured,
    /// Only bestsellers.
    Bestseller,
    /// Search in title, subtitle, description, author name and ISBN.
    Text(String),
    /// Books sharing a category or author with another book.
    RelatedTo {
        category_id: Option<CategoryId>,
        author_id: Option<AuthorId>,
    },
    /// Leave one book out.
    Exclude(BookId),
}

impl Filter {
    /// Create a category filter.
    pub fn category(id: impl Into<CategoryId>) -> Self {
        Filter::Categories(vec![id.into()])
    }

    /// Create a price range filter.
    pub fn price_range(min: Option<Money>, max: Option<Money>) -> Self {
        Filter::PriceRange { min, max }
    }

    /// Create an in-stock filter.
    pub fn in_stock() -> Self {
        Filter::InStock
    }

    /// Create a text search filter.
    pub fn text(query: impl Into<String>) -> Self {
        Filter::Text(query.into())
    }

    /// Build SQL WHERE clause component.
    pub fn to_sql(&self) -> (String, Vec<String>) {
        match self {
            Filter::Active => ("b.is_active = 1".to_string(), vec![]),
            Filter::Categories(ids) => in_list("b.category_id", ids.iter().map(|id| id.get().to_string())),
            Filter::Authors(ids) => in_list("b.author_id", ids.iter().map(|id| id.get().to_string())),
            Filter::Publisher(id) => ("b.publisher_id = ?".to_string(), vec![id.get().to_string()]),
            Filter::Languages(languages) => {
                in_list("b.language", languages.iter().map(|l| l.code().to_string()))
            }
            Filter::PriceRange { min, max } => {
                let mut clauses = Vec::new();
                let mut values = Vec::new();
                if let Some(min) = min {
                    clauses.push("b.price_cents >= ?".to_string());
                    values.push(min.amount_cents.to_string());
                }
                if let Some(max) = max {
                    clauses.push("b.price_cents <= ?".to_string());
                    values.push(max.amount_cents.to_string());
                }
                (clauses.join(" AND "), values)
            }
            Filter::Rating { min } => ("b.rating >= ?".to_string(), vec![min.to_string()]),
            Filter::InStock => ("b.stock > 0".to_string(), vec![]),
            Filter::Featured => ("b.is_featured = 1".to_string(), vec![]),
            Filter::Bestseller => ("b.is_bestseller = 1".to_string(), vec![]),
            Filter::Text(query) => {
                let clause = ["b.title", "b.subtitle", "b.description", "a.name", "b.isbn"]
                    .iter()
                    .map(|column| format!("{} LIKE ? ESCAPE '\\'", column))
                    .collect::<Vec<_>>()
                    .join(" OR ");
                (format!("({})", clause), vec![contains_pattern(query); 5])
            }
            Filter::RelatedTo {
                category_id,
                author_id,
            } => {
                let mut clauses = Vec::new();
                let mut values = Vec::new();
                if let Some(id) = category_id {
                    clauses.push("b.category_id = ?".to_string());
                    values.push(id.get().to_string());
                }
                if let Some(id) = author_id {
                    clauses.push("b.author_id = ?".to_string());
                    values.push(id.get().to_string());
                }
                if clauses.is_empty() {
                    // Nothing to relate on.
                    return ("0 = 1".to_string(), vec![]);
                }
                (clauses.join(" OR "), values)
            }
            Filter::Exclude(id) => ("b.id != ?".to_string(), vec![id.get().to_string()]),
        }
    }
}

/// `%text%` with LIKE wildcards in `text` matched literally.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn in_list(column: &str, values: impl Iterator<Item = String>) -> (String, Vec<String>) {
    let values: Vec<String> = values.collect();
    if values.is_empty() {
        return (String::new(), vec![]);
    }
    let placeholders = values.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
    (format!("{} IN ({})", column, placeholders), values)
}
