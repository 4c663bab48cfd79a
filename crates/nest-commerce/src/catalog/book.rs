//! Book types.

use crate::error::CommerceError;
use crate::ids::{AuthorId, BookId, CategoryId, PublisherId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Language a book is printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "uz")]
    Uzbek,
    #[serde(rename = "ru")]
    Russian,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "es")]
    Spanish,
}

impl Language {
    /// Get the two-letter language code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Uzbek => "uz",
            Language::Russian => "ru",
            Language::French => "fr",
            Language::German => "de",
            Language::Spanish => "es",
        }
    }

    /// Parse a two-letter language code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "en" => Some(Language::English),
            "uz" => Some(Language::Uzbek),
            "ru" => Some(Language::Russian),
            "fr" => Some(Language::French),
            "de" => Some(Language::German),
            "es" => Some(Language::Spanish),
            _ => None,
        }
    }
}

/// Physical condition of a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    New,
    LikeNew,
    Good,
    Acceptable,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::LikeNew => "like_new",
            Condition::Good => "good",
            Condition::Acceptable => "acceptable",
        }
    }
}

/// A book in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    /// Unique book identifier.
    pub id: BookId,
    /// Title.
    pub title: String,
    /// URL-friendly slug, unique across books.
    pub slug: String,
    /// Subtitle.
    pub subtitle: Option<String>,
    /// ISBN, unique when present.
    pub isbn: Option<String>,
    /// Description.
    pub description: String,
    /// Author reference.
    pub author_id: Option<AuthorId>,
    /// Author name (joined for display).
    pub author_name: Option<String>,
    /// Category reference.
    pub category_id: Option<CategoryId>,
    /// Category name (joined for display).
    pub category_name: Option<String>,
    /// Publisher reference.
    pub publisher_id: Option<PublisherId>,
    /// Publisher name (joined for display).
    pub publisher_name: Option<String>,
    /// List price. Orders are charged at this price.
    pub price: Money,
    /// Sale price shown to shoppers when set.
    pub discount_price: Option<Money>,
    /// Units on hand.
    pub stock: i64,
    /// Page count.
    pub pages: Option<i64>,
    /// Printed language.
    pub language: Language,
    /// Copy condition.
    pub condition: Condition,
    /// Year of publication.
    pub publication_year: Option<i64>,
    /// Cover image path.
    pub cover_image: Option<String>,
    /// Average review rating, two decimals.
    pub rating: f64,
    /// Number of reviews.
    pub review_count: i64,
    /// Detail page views.
    pub view_count: i64,
    /// Shown on the featured shelf.
    pub is_featured: bool,
    /// Shown on the bestseller shelf.
    pub is_bestseller: bool,
    /// Inactive books are hidden from the storefront.
    pub is_active: bool,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Book {
    /// Price a shopper sees: the sale price when set, the list price otherwise.
    pub fn final_price(&self) -> Money {
        self.discount_price.unwrap_or(self.price)
    }

    /// Check if any copies are on hand.
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whole-number percentage saved by the sale price.
    pub fn discount_percentage(&self) -> i64 {
        match self.discount_price {
            Some(sale) if sale.amount_cents < self.price.amount_cents && self.price.is_positive() => {
                let saved = (self.price.amount_cents - sale.amount_cents) as f64;
                (saved / self.price.amount_cents as f64 * 100.0).round() as i64
            }
            _ => 0,
        }
    }

    /// Check that `quantity` copies can be taken from stock.
    pub fn ensure_available(&self, quantity: i64) -> Result<(), CommerceError> {
        if quantity > self.stock {
            return Err(CommerceError::InsufficientStock {
                book_id: self.id,
                requested: quantity,
                available: self.stock,
            });
        }
        Ok(())
    }
}

/// Input for creating or replacing a book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct BookDraft {
    pub title: String,
    /// Derived from the title when absent.
    pub slug: Option<String>,
    pub subtitle: Option<String>,
    pub isbn: Option<String>,
    pub description: String,
    pub author_id: Option<AuthorId>,
    pub category_id: Option<CategoryId>,
    pub publisher_id: Option<PublisherId>,
    pub price_cents: i64,
    pub discount_price_cents: Option<i64>,
    pub stock: i64,
    pub pages: Option<i64>,
    pub language: Language,
    pub condition: Condition,
    pub publication_year: Option<i64>,
    pub cover_image: Option<String>,
    pub is_featured: bool,
    pub is_bestseller: bool,
}

impl BookDraft {
    /// Create a draft with the required fields.
    pub fn new(title: impl Into<String>, price_cents: i64, stock: i64) -> Self {
        Self {
            title: title.into(),
            price_cents,
            stock,
            ..Self::default()
        }
    }

    /// Set the author.
    pub fn with_author(mut self, author_id: AuthorId) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Set a sale price.
    pub fn with_discount_price(mut self, cents: i64) -> Self {
        self.discount_price_cents = Some(cents);
        self
    }

    /// Check field constraints.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.title.trim().is_empty() {
            return Err(CommerceError::MissingField("title"));
        }
        if self.price_cents < 0 {
            return Err(CommerceError::ValidationError(
                "price cannot be negative".to_string(),
            ));
        }
        if matches!(self.discount_price_cents, Some(d) if d < 0) {
            return Err(CommerceError::ValidationError(
                "discount price cannot be negative".to_string(),
            ));
        }
        if self.stock < 0 {
            return Err(CommerceError::ValidationError(
                "stock cannot be negative".to_string(),
            ));
        }
        if matches!(self.pages, Some(p) if p < 1) {
            return Err(CommerceError::ValidationError(
                "pages must be at least 1".to_string(),
            ));
        }
        if matches!(self.publication_year, Some(y) if !(1000..=2100).contains(&y)) {
            return Err(CommerceError::ValidationError(
                "publication year must be between 1000 and 2100".to_string(),
            ));
        }
        Ok(())
    }

    /// List price in the store currency.
    pub fn price(&self, currency: Currency) -> Money {
        Money::new(self.price_cents, currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> Book {
        Book {
            id: BookId::new(1),
            title: "Dune".to_string(),
            slug: "dune".to_string(),
            subtitle: None,
            isbn: None,
            description: String::new(),
            author_id: None,
            author_name: None,
            category_id: None,
            category_name: None,
            publisher_id: None,
            publisher_name: None,
            price: Money::new(2000, Currency::USD),
            discount_price: None,
            stock: 5,
            pages: Some(412),
            language: Language::English,
            condition: Condition::New,
            publication_year: Some(1965),
            cover_image: None,
            rating: 0.0,
            review_count: 0,
            view_count: 0,
            is_featured: false,
            is_bestseller: false,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_final_price_prefers_sale_price() {
        let mut book = sample_book();
        assert_eq!(book.final_price().amount_cents, 2000);

        book.discount_price = Some(Money::new(1500, Currency::USD));
        assert_eq!(book.final_price().amount_cents, 1500);
        assert_eq!(book.discount_percentage(), 25);
    }

    #[test]
    fn test_discount_percentage_ignores_higher_sale_price() {
        let mut book = sample_book();
        book.discount_price = Some(Money::new(2500, Currency::USD));
        assert_eq!(book.discount_percentage(), 0);
    }

    #[test]
    fn test_ensure_available() {
        let book = sample_book();
        assert!(book.ensure_available(5).is_ok());
        assert!(matches!(
            book.ensure_available(6),
            Err(CommerceError::InsufficientStock { requested: 6, available: 5, .. })
        ));
    }

    #[test]
    fn test_draft_validation() {
        assert!(BookDraft::new("Dune", 2000, 3).validate().is_ok());
        assert!(BookDraft::new("  ", 2000, 3).validate().is_err());
        assert!(BookDraft::new("Dune", -1, 3).validate().is_err());

        let mut draft = BookDraft::new("Dune", 2000, 3);
        draft.publication_year = Some(999);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_code("UZ"), Some(Language::Uzbek));
        assert_eq!(
            serde_json::to_string(&Language::Russian).unwrap(),
            "\"ru\""
        );
        assert_eq!(Condition::LikeNew.as_str(), "like_new");
    }
}
