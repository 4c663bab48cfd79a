//! Catalog persistence: books, categories, authors, publishers.

use super::{current_timestamp, Store};
use crate::catalog::{
    unique_slug, Author, AuthorDraft, Book, BookDraft, Category, CategoryDraft, Condition,
    Language, Publisher, PublisherDraft,
};
use crate::error::CommerceError;
use crate::ids::{AuthorId, BookId, CategoryId, PublisherId};
use crate::money::{Currency, Money};
use crate::search::{Filter, Pagination, SearchQuery, SearchResults, BOOK_SOURCE};
use nest_db::{params, Executor, Value};
use serde::Deserialize;

/// Columns selected for a [`Book`] from [`BOOK_SOURCE`].
const BOOK_COLUMNS: &str = "b.id, b.title, b.slug, b.subtitle, b.isbn, b.description, \
    b.author_id, a.name AS author_name, b.category_id, c.name AS category_name, \
    b.publisher_id, p.name AS publisher_name, b.price_cents, b.discount_price_cents, \
    b.stock, b.pages, b.language, b.condition, b.publication_year, b.cover_image, \
    b.rating, b.review_count, b.view_count, b.is_featured, b.is_bestseller, b.is_active, \
    b.created_at, b.updated_at";

/// Default size of the featured, bestseller and new arrival shelves.
pub const DEFAULT_SHELF_LIMIT: i64 = 10;
/// Largest shelf that can be requested.
pub const MAX_SHELF_LIMIT: i64 = 50;
/// Default number of related books.
pub const DEFAULT_RELATED_LIMIT: i64 = 6;

#[derive(Deserialize)]
struct BookRow {
    id: BookId,
    title: String,
    slug: String,
    subtitle: Option<String>,
    isbn: Option<String>,
    description: String,
    author_id: Option<AuthorId>,
    author_name: Option<String>,
    category_id: Option<CategoryId>,
    category_name: Option<String>,
    publisher_id: Option<PublisherId>,
    publisher_name: Option<String>,
    price_cents: i64,
    discount_price_cents: Option<i64>,
    stock: i64,
    pages: Option<i64>,
    language: Language,
    condition: Condition,
    publication_year: Option<i64>,
    cover_image: Option<String>,
    rating: f64,
    review_count: i64,
    view_count: i64,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    is_featured: bool,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    is_bestseller: bool,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    is_active: bool,
    created_at: i64,
    updated_at: i64,
}

impl BookRow {
    fn into_book(self, currency: Currency) -> Book {
        Book {
            id: self.id,
            title: self.title,
            slug: self.slug,
            subtitle: self.subtitle,
            isbn: self.isbn,
            description: self.description,
            author_id: self.author_id,
            author_name: self.author_name,
            category_id: self.category_id,
            category_name: self.category_name,
            publisher_id: self.publisher_id,
            publisher_name: self.publisher_name,
            price: Money::new(self.price_cents, currency),
            discount_price: self.discount_price_cents.map(|c| Money::new(c, currency)),
            stock: self.stock,
            pages: self.pages,
            language: self.language,
            condition: self.condition,
            publication_year: self.publication_year,
            cover_image: self.cover_image,
            rating: self.rating,
            review_count: self.review_count,
            view_count: self.view_count,
            is_featured: self.is_featured,
            is_bestseller: self.is_bestseller,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Deserialize)]
struct CategoryRow {
    id: CategoryId,
    parent_id: Option<CategoryId>,
    name: String,
    slug: String,
    description: String,
    icon: Option<String>,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    is_active: bool,
    book_count: i64,
    created_at: i64,
    updated_at: i64,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            parent_id: row.parent_id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            icon: row.icon,
            is_active: row.is_active,
            book_count: row.book_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const CATEGORY_SELECT: &str = "SELECT c.id, c.parent_id, c.name, c.slug, c.description, c.icon, \
    c.is_active, c.created_at, c.updated_at, \
    (SELECT COUNT(*) FROM books b WHERE b.category_id = c.id AND b.is_active = 1) AS book_count \
    FROM categories c";

const AUTHOR_SELECT: &str = "SELECT au.id, au.name, au.slug, au.bio, au.birth_date, \
    au.nationality, au.created_at, au.updated_at, \
    (SELECT COUNT(*) FROM books b WHERE b.author_id = au.id AND b.is_active = 1) AS book_count \
    FROM authors au";

const PUBLISHER_SELECT: &str = "SELECT pu.id, pu.name, pu.slug, pu.website, pu.created_at, \
    pu.updated_at, \
    (SELECT COUNT(*) FROM books b WHERE b.publisher_id = pu.id AND b.is_active = 1) AS book_count \
    FROM publishers pu";

/// Load an active book.
pub(super) fn find_active_book<E: Executor>(
    ex: &E,
    id: BookId,
    currency: Currency,
) -> Result<Book, CommerceError> {
    let sql = format!(
        "SELECT {} FROM {} WHERE b.id = ? AND b.is_active = 1",
        BOOK_COLUMNS, BOOK_SOURCE
    );
    ex.query_optional::<BookRow>(&sql, params![id])?
        .map(|row| row.into_book(currency))
        .ok_or(CommerceError::BookNotFound(id))
}

fn slug_taken<E: Executor>(
    ex: &E,
    table: &str,
    slug: &str,
    exclude: Option<i64>,
) -> Result<bool, CommerceError> {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE slug = ? AND id != ?", table);
    let count = ex.query_scalar(&sql, params![slug, exclude.unwrap_or(0)])?;
    Ok(count > 0)
}

/// Pick a free slug for `table`, seeded from an explicit slug or the name.
fn assign_slug<E: Executor>(
    ex: &E,
    table: &str,
    explicit: Option<&str>,
    name: &str,
    exclude: Option<i64>,
) -> Result<String, CommerceError> {
    let seed = explicit.filter(|s| !s.trim().is_empty()).unwrap_or(name);
    unique_slug(seed, |candidate| slug_taken(ex, table, candidate, exclude))
}

fn clamp_shelf(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_SHELF_LIMIT).clamp(1, MAX_SHELF_LIMIT)
}

fn to_values(values: Vec<String>) -> Vec<Value> {
    values.into_iter().map(Value::from).collect()
}

impl Store {
    // ----- books: reading -----

    /// List active books matching `query`.
    pub fn list_books(&self, query: &SearchQuery) -> Result<SearchResults<Book>, CommerceError> {
        let (count_sql, count_values) = query.build_count_sql();
        let total = self.db().query_scalar(&count_sql, &to_values(count_values))?;

        let (sql, values) = query.build_sql(BOOK_COLUMNS);
        let rows: Vec<BookRow> = self.db().query_as(&sql, &to_values(values))?;
        let currency = self.settings().currency;
        let books = rows.into_iter().map(|r| r.into_book(currency)).collect();

        Ok(SearchResults::new(
            books,
            Pagination::new(query.page, query.per_page, total),
        ))
    }

    /// Free-text search over active books. An empty query is rejected.
    pub fn search_books(&self, query: SearchQuery) -> Result<SearchResults<Book>, CommerceError> {
        if query.query.is_none() {
            return Err(CommerceError::ValidationError(
                "search query cannot be empty".to_string(),
            ));
        }
        self.list_books(&query)
    }

    /// Featured books, newest first.
    pub fn featured_books(&self, limit: Option<i64>) -> Result<Vec<Book>, CommerceError> {
        self.shelf(Filter::Featured, "b.created_at DESC, b.id DESC", clamp_shelf(limit))
    }

    /// Bestsellers, most reviewed first.
    pub fn bestsellers(&self, limit: Option<i64>) -> Result<Vec<Book>, CommerceError> {
        self.shelf(Filter::Bestseller, "b.review_count DESC, b.id DESC", clamp_shelf(limit))
    }

    /// Most recently added books.
    pub fn new_arrivals(&self, limit: Option<i64>) -> Result<Vec<Book>, CommerceError> {
        self.shelf(Filter::Active, "b.created_at DESC, b.id DESC", clamp_shelf(limit))
    }

    /// Books sharing a category or an author with `id`.
    pub fn related_books(&self, id: BookId, limit: Option<i64>) -> Result<Vec<Book>, CommerceError> {
        let book = self.book(id)?;
        let limit = limit.unwrap_or(DEFAULT_RELATED_LIMIT).clamp(1, MAX_SHELF_LIMIT);
        let query = SearchQuery::new()
            .with_filter(Filter::RelatedTo {
                category_id: book.category_id,
                author_id: book.author_id,
            })
            .with_filter(Filter::Exclude(id))
            .with_pagination(1, limit);
        Ok(self.list_books(&query)?.items)
    }

    fn shelf(&self, filter: Filter, order_by: &str, limit: i64) -> Result<Vec<Book>, CommerceError> {
        let query = SearchQuery::new().with_filter(filter);
        let (where_clause, values) = query.build_where_clause();
        let sql = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY {} LIMIT {}",
            BOOK_COLUMNS, BOOK_SOURCE, where_clause, order_by, limit
        );
        let rows: Vec<BookRow> = self.db().query_as(&sql, &to_values(values))?;
        let currency = self.settings().currency;
        Ok(rows.into_iter().map(|r| r.into_book(currency)).collect())
    }

    /// Get an active book without counting a view.
    pub fn book(&self, id: BookId) -> Result<Book, CommerceError> {
        find_active_book(self.db(), id, self.settings().currency)
    }

    /// Get an active book for its detail page, counting the view.
    pub fn view_book(&self, id: BookId) -> Result<Book, CommerceError> {
        let currency = self.settings().currency;
        self.db().transaction(|tx| {
            let changed = tx.execute(
                "UPDATE books SET view_count = view_count + 1 WHERE id = ? AND is_active = 1",
                params![id],
            )?;
            if changed == 0 {
                return Err(CommerceError::BookNotFound(id));
            }
            find_active_book(tx, id, currency)
        })
    }

    /// Get an active book by slug without counting a view.
    pub fn book_by_slug(&self, slug: &str) -> Result<Book, CommerceError> {
        let id = self.active_book_id(slug)?;
        self.book(id)
    }

    /// Get an active book by slug for its detail page, counting the view.
    pub fn view_book_by_slug(&self, slug: &str) -> Result<Book, CommerceError> {
        let id = self.active_book_id(slug)?;
        self.view_book(id)
    }

    fn active_book_id(&self, slug: &str) -> Result<BookId, CommerceError> {
        self.db()
            .query("SELECT id FROM books WHERE slug = ? AND is_active = 1", params![slug])?
            .first()
            .and_then(|row| row.get_index(0))
            .and_then(Value::as_integer)
            .map(BookId::new)
            .ok_or_else(|| CommerceError::BookSlugNotFound(slug.to_string()))
    }

    // ----- books: writing -----

    /// Add a book to the catalog.
    pub fn create_book(&self, draft: &BookDraft) -> Result<Book, CommerceError> {
        draft.validate()?;
        let now = current_timestamp();
        let id = self.db().transaction(|tx| {
            check_book_references(tx, draft)?;
            let slug = assign_slug(tx, "books", draft.slug.as_deref(), &draft.title, None)?;
            let id = tx.insert(
                "INSERT INTO books (title, slug, subtitle, isbn, description, author_id, \
                 category_id, publisher_id, price_cents, discount_price_cents, stock, pages, \
                 language, condition, publication_year, cover_image, is_featured, \
                 is_bestseller, is_active, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)",
                params![
                    draft.title.trim(),
                    slug,
                    draft.subtitle.clone(),
                    blank_to_none(draft.isbn.as_deref()),
                    &draft.description,
                    draft.author_id,
                    draft.category_id,
                    draft.publisher_id,
                    draft.price_cents,
                    draft.discount_price_cents,
                    draft.stock,
                    draft.pages,
                    draft.language.code(),
                    draft.condition.as_str(),
                    draft.publication_year,
                    draft.cover_image.clone(),
                    draft.is_featured,
                    draft.is_bestseller,
                    now,
                    now
                ],
            )?;
            Ok::<_, CommerceError>(BookId::new(id))
        })?;
        tracing::info!(book_id = %id, title = %draft.title, "book created");
        self.book(id)
    }

    /// Replace a book's editable fields. The slug is kept unless the draft
    /// names a new one.
    pub fn update_book(&self, id: BookId, draft: &BookDraft) -> Result<Book, CommerceError> {
        draft.validate()?;
        let currency = self.settings().currency;
        self.db().transaction(|tx| {
            let existing = find_active_book(tx, id, currency)?;
            check_book_references(tx, draft)?;
            let slug = match draft.slug.as_deref() {
                Some(explicit) if explicit != existing.slug => {
                    assign_slug(tx, "books", Some(explicit), &draft.title, Some(id.get()))?
                }
                _ => existing.slug,
            };
            tx.execute(
                "UPDATE books SET title = ?, slug = ?, subtitle = ?, isbn = ?, description = ?, \
                 author_id = ?, category_id = ?, publisher_id = ?, price_cents = ?, \
                 discount_price_cents = ?, stock = ?, pages = ?, language = ?, condition = ?, \
                 publication_year = ?, cover_image = ?, is_featured = ?, is_bestseller = ?, \
                 updated_at = ? WHERE id = ?",
                params![
                    draft.title.trim(),
                    slug,
                    draft.subtitle.clone(),
                    blank_to_none(draft.isbn.as_deref()),
                    &draft.description,
                    draft.author_id,
                    draft.category_id,
                    draft.publisher_id,
                    draft.price_cents,
                    draft.discount_price_cents,
                    draft.stock,
                    draft.pages,
                    draft.language.code(),
                    draft.condition.as_str(),
                    draft.publication_year,
                    draft.cover_image.clone(),
                    draft.is_featured,
                    draft.is_bestseller,
                    current_timestamp(),
                    id
                ],
            )?;
            find_active_book(tx, id, currency)
        })
    }

    /// Hide a book from the storefront. Orders and reviews keep referring
    /// to it.
    pub fn delete_book(&self, id: BookId) -> Result<(), CommerceError> {
        let changed = self.db().execute(
            "UPDATE books SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
            params![current_timestamp(), id],
        )?;
        if changed == 0 {
            return Err(CommerceError::BookNotFound(id));
        }
        tracing::info!(book_id = %id, "book deactivated");
        Ok(())
    }

    // ----- categories -----

    /// Active categories in name order.
    pub fn list_categories(&self) -> Result<Vec<Category>, CommerceError> {
        let sql = format!("{} WHERE c.is_active = 1 ORDER BY c.name", CATEGORY_SELECT);
        let rows: Vec<CategoryRow> = self.db().query_as(&sql, params![])?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Get an active category by slug.
    pub fn category_by_slug(&self, slug: &str) -> Result<Category, CommerceError> {
        let sql = format!("{} WHERE c.slug = ? AND c.is_active = 1", CATEGORY_SELECT);
        self.db()
            .query_optional::<CategoryRow>(&sql, params![slug])?
            .map(Category::from)
            .ok_or_else(|| CommerceError::CategoryNotFound(slug.to_string()))
    }

    pub fn create_category(&self, draft: &CategoryDraft) -> Result<Category, CommerceError> {
        draft.validate(None)?;
        let now = current_timestamp();
        let slug = self.db().transaction(|tx| {
            check_parent(tx, draft.parent_id)?;
            let slug = assign_slug(tx, "categories", draft.slug.as_deref(), &draft.name, None)?;
            tx.insert(
                "INSERT INTO categories (name, slug, description, icon, parent_id, is_active, \
                 created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    draft.name.trim(),
                    &slug,
                    &draft.description,
                    draft.icon.clone(),
                    draft.parent_id,
                    draft.is_active,
                    now,
                    now
                ],
            )?;
            Ok::<_, CommerceError>(slug)
        })?;
        self.category_including_inactive(&slug)
    }

    pub fn update_category(&self, slug: &str, draft: &CategoryDraft) -> Result<Category, CommerceError> {
        let existing = self.category_including_inactive(slug)?;
        draft.validate(Some(existing.id))?;
        let new_slug = self.db().transaction(|tx| {
            check_parent(tx, draft.parent_id)?;
            let new_slug = match draft.slug.as_deref() {
                Some(explicit) if explicit != existing.slug => assign_slug(
                    tx,
                    "categories",
                    Some(explicit),
                    &draft.name,
                    Some(existing.id.get()),
                )?,
                _ => existing.slug.clone(),
            };
            tx.execute(
                "UPDATE categories SET name = ?, slug = ?, description = ?, icon = ?, \
                 parent_id = ?, is_active = ?, updated_at = ? WHERE id = ?",
                params![
                    draft.name.trim(),
                    &new_slug,
                    &draft.description,
                    draft.icon.clone(),
                    draft.parent_id,
                    draft.is_active,
                    current_timestamp(),
                    existing.id
                ],
            )?;
            Ok::<_, CommerceError>(new_slug)
        })?;
        self.category_including_inactive(&new_slug)
    }

    pub fn delete_category(&self, slug: &str) -> Result<(), CommerceError> {
        let changed = self
            .db()
            .execute("DELETE FROM categories WHERE slug = ?", params![slug])?;
        if changed == 0 {
            return Err(CommerceError::CategoryNotFound(slug.to_string()));
        }
        Ok(())
    }

    fn category_including_inactive(&self, slug: &str) -> Result<Category, CommerceError> {
        let sql = format!("{} WHERE c.slug = ?", CATEGORY_SELECT);
        self.db()
            .query_optional::<CategoryRow>(&sql, params![slug])?
            .map(Category::from)
            .ok_or_else(|| CommerceError::CategoryNotFound(slug.to_string()))
    }

    // ----- authors -----

    /// All authors in name order.
    pub fn list_authors(&self) -> Result<Vec<Author>, CommerceError> {
        let sql = format!("{} ORDER BY au.name", AUTHOR_SELECT);
        Ok(self.db().query_as(&sql, params![])?)
    }

    pub fn author_by_slug(&self, slug: &str) -> Result<Author, CommerceError> {
        let sql = format!("{} WHERE au.slug = ?", AUTHOR_SELECT);
        self.db()
            .query_optional(&sql, params![slug])?
            .ok_or_else(|| CommerceError::AuthorNotFound(slug.to_string()))
    }

    pub fn create_author(&self, draft: &AuthorDraft) -> Result<Author, CommerceError> {
        draft.validate()?;
        let now = current_timestamp();
        let slug = self.db().transaction(|tx| {
            let slug = assign_slug(tx, "authors", draft.slug.as_deref(), &draft.name, None)?;
            tx.insert(
                "INSERT INTO authors (name, slug, bio, birth_date, nationality, created_at, \
                 updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
                params![
                    draft.name.trim(),
                    &slug,
                    &draft.bio,
                    draft.birth_date.clone(),
                    draft.nationality.clone(),
                    now,
                    now
                ],
            )?;
            Ok::<_, CommerceError>(slug)
        })?;
        self.author_by_slug(&slug)
    }

    pub fn update_author(&self, slug: &str, draft: &AuthorDraft) -> Result<Author, CommerceError> {
        draft.validate()?;
        let existing = self.author_by_slug(slug)?;
        let new_slug = self.db().transaction(|tx| {
            let new_slug = match draft.slug.as_deref() {
                Some(explicit) if explicit != existing.slug => assign_slug(
                    tx,
                    "authors",
                    Some(explicit),
                    &draft.name,
                    Some(existing.id.get()),
                )?,
                _ => existing.slug.clone(),
            };
            tx.execute(
                "UPDATE authors SET name = ?, slug = ?, bio = ?, birth_date = ?, \
                 nationality = ?, updated_at = ? WHERE id = ?",
                params![
                    draft.name.trim(),
                    &new_slug,
                    &draft.bio,
                    draft.birth_date.clone(),
                    draft.nationality.clone(),
                    current_timestamp(),
                    existing.id
                ],
            )?;
            Ok::<_, CommerceError>(new_slug)
        })?;
        self.author_by_slug(&new_slug)
    }

    pub fn delete_author(&self, slug: &str) -> Result<(), CommerceError> {
        let changed = self
            .db()
            .execute("DELETE FROM authors WHERE slug = ?", params![slug])?;
        if changed == 0 {
            return Err(CommerceError::AuthorNotFound(slug.to_string()));
        }
        Ok(())
    }

    // ----- publishers -----

    /// All publishers in name order.
    pub fn list_publishers(&self) -> Result<Vec<Publisher>, CommerceError> {
        let sql = format!("{} ORDER BY pu.name", PUBLISHER_SELECT);
        Ok(self.db().query_as(&sql, params![])?)
    }

    pub fn publisher_by_slug(&self, slug: &str) -> Result<Publisher, CommerceError> {
        let sql = format!("{} WHERE pu.slug = ?", PUBLISHER_SELECT);
        self.db()
            .query_optional(&sql, params![slug])?
            .ok_or_else(|| CommerceError::PublisherNotFound(slug.to_string()))
    }

    pub fn create_publisher(&self, draft: &PublisherDraft) -> Result<Publisher, CommerceError> {
        draft.validate()?;
        let now = current_timestamp();
        let slug = self.db().transaction(|tx| {
            let slug = assign_slug(tx, "publishers", draft.slug.as_deref(), &draft.name, None)?;
            tx.insert(
                "INSERT INTO publishers (name, slug, website, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?)",
                params![draft.name.trim(), &slug, draft.website.clone(), now, now],
            )?;
            Ok::<_, CommerceError>(slug)
        })?;
        self.publisher_by_slug(&slug)
    }

    pub fn update_publisher(
        &self,
        slug: &str,
        draft: &PublisherDraft,
    ) -> Result<Publisher, CommerceError> {
        draft.validate()?;
        let existing = self.publisher_by_slug(slug)?;
        let new_slug = self.db().transaction(|tx| {
            let new_slug = match draft.slug.as_deref() {
                Some(explicit) if explicit != existing.slug => assign_slug(
                    tx,
                    "publishers",
                    Some(explicit),
                    &draft.name,
                    Some(existing.id.get()),
                )?,
                _ => existing.slug.clone(),
            };
            tx.execute(
                "UPDATE publishers SET name = ?, slug = ?, website = ?, updated_at = ? \
                 WHERE id = ?",
                params![
                    draft.name.trim(),
                    &new_slug,
                    draft.website.clone(),
                    current_timestamp(),
                    existing.id
                ],
            )?;
            Ok::<_, CommerceError>(new_slug)
        })?;
        self.publisher_by_slug(&new_slug)
    }

    pub fn delete_publisher(&self, slug: &str) -> Result<(), CommerceError> {
        let changed = self
            .db()
            .execute("DELETE FROM publishers WHERE slug = ?", params![slug])?;
        if changed == 0 {
            return Err(CommerceError::PublisherNotFound(slug.to_string()));
        }
        Ok(())
    }
}

fn blank_to_none(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn check_book_references<E: Executor>(ex: &E, draft: &BookDraft) -> Result<(), CommerceError> {
    if let Some(id) = draft.author_id {
        if ex.query_scalar("SELECT COUNT(*) FROM authors WHERE id = ?", params![id])? == 0 {
            return Err(CommerceError::AuthorNotFound(id.to_string()));
        }
    }
    if let Some(id) = draft.category_id {
        if ex.query_scalar("SELECT COUNT(*) FROM categories WHERE id = ?", params![id])? == 0 {
            return Err(CommerceError::CategoryNotFound(id.to_string()));
        }
    }
    if let Some(id) = draft.publisher_id {
        if ex.query_scalar("SELECT COUNT(*) FROM publishers WHERE id = ?", params![id])? == 0 {
            return Err(CommerceError::PublisherNotFound(id.to_string()));
        }
    }
    Ok(())
}

fn check_parent<E: Executor>(ex: &E, parent_id: Option<CategoryId>) -> Result<(), CommerceError> {
    if let Some(id) = parent_id {
        if ex.query_scalar("SELECT COUNT(*) FROM categories WHERE id = ?", params![id])? == 0 {
            return Err(CommerceError::CategoryNotFound(id.to_string()));
        }
    }
    Ok(())
}
