//! Book browsing, search and staff catalog edits.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use nest_commerce::catalog::{Book, BookDraft, Language};
use nest_commerce::ids::{AuthorId, BookId, CategoryId, PublisherId};
use nest_commerce::search::{
    Filter, SearchQuery, SearchResults, SortOption, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use nest_commerce::{Currency, Money};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery, StaffUser};
use crate::state::AppState;

/// Query string accepted by the list and search endpoints.
///
/// List-valued filters are comma separated: `?category=1,4&language=en,uz`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub category: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<i64>,
    pub language: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    #[serde(alias = "min_rating")]
    pub rating: Option<f64>,
    pub in_stock: Option<bool>,
    pub featured: Option<bool>,
    pub bestseller: Option<bool>,
    #[serde(alias = "q")]
    pub search: Option<String>,
    #[serde(alias = "ordering", alias = "sort")]
    pub sort_by: Option<String>,
}

impl BookListParams {
    /// Build a store query, rejecting malformed values.
    pub fn into_query(self, currency: Currency) -> Result<SearchQuery, ApiError> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(ApiError::bad_request("page must be at least 1"));
        }
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(ApiError::bad_request(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        let mut query = SearchQuery::new().with_pagination(page, page_size);

        if let Some(raw) = self.category.as_deref() {
            let ids = parse_ids(raw, "category")?;
            query = query.with_filter(Filter::Categories(ids.into_iter().map(CategoryId::new).collect()));
        }
        if let Some(raw) = self.author.as_deref() {
            let ids = parse_ids(raw, "author")?;
            query = query.with_filter(Filter::Authors(ids.into_iter().map(AuthorId::new).collect()));
        }
        if let Some(id) = self.publisher {
            query = query.with_filter(Filter::Publisher(PublisherId::new(id)));
        }
        if let Some(raw) = self.language.as_deref() {
            let languages = split_list(raw)
                .map(|code| {
                    Language::from_code(code)
                        .ok_or_else(|| ApiError::bad_request(format!("unknown language: {}", code)))
                })
                .collect::<Result<Vec<_>, _>>()?;
            if !languages.is_empty() {
                query = query.with_filter(Filter::Languages(languages));
            }
        }

        for (name, value) in [("min_price", self.min_price), ("max_price", self.max_price)] {
            if matches!(value, Some(v) if v < 0.0) {
                return Err(ApiError::bad_request(format!("{} must not be negative", name)));
            }
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            query = query.with_filter(Filter::price_range(
                self.min_price.map(|v| Money::from_decimal(v, currency)),
                self.max_price.map(|v| Money::from_decimal(v, currency)),
            ));
        }

        if let Some(min) = self.rating {
            if !(0.0..=5.0).contains(&min) {
                return Err(ApiError::bad_request("rating must be between 0 and 5"));
            }
            query = query.with_filter(Filter::Rating { min });
        }
        if self.in_stock == Some(true) {
            query = query.with_filter(Filter::in_stock());
        }
        if self.featured == Some(true) {
            query = query.with_filter(Filter::Featured);
        }
        if self.bestseller == Some(true) {
            query = query.with_filter(Filter::Bestseller);
        }
        if let Some(text) = self.search {
            query = query.with_query(text);
        }
        if let Some(sort) = self.sort_by.as_deref() {
            let sort = SortOption::from_param(sort)
                .ok_or_else(|| ApiError::bad_request(format!("unknown sort option: {}", sort)))?;
            query = query.with_sort(sort);
        }
        Ok(query)
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|part| !part.is_empty())
}

fn parse_ids(raw: &str, name: &str) -> Result<Vec<i64>, ApiError> {
    split_list(raw)
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| ApiError::bad_request(format!("{}: expected an id, got {:?}", name, part)))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/featured", get(featured))
        .route("/bestsellers", get(bestsellers))
        .route("/new-arrivals", get(new_arrivals))
        .route("/search", get(search))
        .route("/slug/{slug}", get(book_by_slug))
        .route("/{id}", get(book_detail).put(update_book).delete(delete_book))
        .route("/{id}/related", get(related))
}

#[tracing::instrument(name = "GET /books", skip(state))]
async fn list_books(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<BookListParams>,
) -> Result<Json<SearchResults<Book>>, ApiError> {
    let query = params.into_query(state.store.settings().currency)?;
    Ok(Json(state.with_store(move |store| store.list_books(&query)).await?))
}

#[tracing::instrument(name = "GET /books/search", skip(state))]
async fn search(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<BookListParams>,
) -> Result<Json<SearchResults<Book>>, ApiError> {
    let query = params.into_query(state.store.settings().currency)?;
    Ok(Json(state.with_store(move |store| store.search_books(query)).await?))
}

#[tracing::instrument(name = "GET /books/featured", skip(state))]
async fn featured(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<LimitParams>,
) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(state.with_store(move |store| store.featured_books(params.limit)).await?))
}

#[tracing::instrument(name = "GET /books/bestsellers", skip(state))]
async fn bestsellers(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<LimitParams>,
) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(state.with_store(move |store| store.bestsellers(params.limit)).await?))
}

#[tracing::instrument(name = "GET /books/new-arrivals", skip(state))]
async fn new_arrivals(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<LimitParams>,
) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(state.with_store(move |store| store.new_arrivals(params.limit)).await?))
}

#[tracing::instrument(name = "GET /books/{id}", skip(state))]
async fn book_detail(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BookId>,
) -> Result<Json<Book>, ApiError> {
    Ok(Json(state.with_store(move |store| store.view_book(id)).await?))
}

#[tracing::instrument(name = "GET /books/slug/{slug}", skip(state))]
async fn book_by_slug(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<Book>, ApiError> {
    Ok(Json(state.with_store(move |store| store.view_book_by_slug(&slug)).await?))
}

#[tracing::instrument(name = "GET /books/{id}/related", skip(state))]
async fn related(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BookId>,
    ApiQuery(params): ApiQuery<LimitParams>,
) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(state.with_store(move |store| store.related_books(id, params.limit)).await?))
}

#[tracing::instrument(name = "POST /books", skip_all, fields(staff_id = %staff.0.id()))]
async fn create_book(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiJson(draft): ApiJson<BookDraft>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let book = state.with_store(move |store| store.create_book(&draft)).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

#[tracing::instrument(name = "PUT /books/{id}", skip_all, fields(staff_id = %staff.0.id(), book_id = %id))]
async fn update_book(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiPath(id): ApiPath<BookId>,
    ApiJson(draft): ApiJson<BookDraft>,
) -> Result<Json<Book>, ApiError> {
    Ok(Json(state.with_store(move |store| store.update_book(id, &draft)).await?))
}

#[tracing::instrument(name = "DELETE /books/{id}", skip_all, fields(staff_id = %staff.0.id(), book_id = %id))]
async fn delete_book(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiPath(id): ApiPath<BookId>,
) -> Result<StatusCode, ApiError> {
    state.with_store(move |store| store.delete_book(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_into_query() {
        let params = BookListParams {
            category: Some("1, 4".into()),
            language: Some("en,uz".into()),
            min_price: Some(10.0),
            in_stock: Some(true),
            search: Some("  dune ".into()),
            sort_by: Some("-price".into()),
            page: Some(2),
            page_size: Some(5),
            ..BookListParams::default()
        };
        let query = params.into_query(Currency::USD).unwrap();
        assert_eq!(query.page, 2);
        assert_eq!(query.per_page, 5);
        assert_eq!(query.sort, SortOption::PriceDesc);
        assert_eq!(query.query.as_deref(), Some("dune"));
        assert!(query
            .filters
            .contains(&Filter::Categories(vec![CategoryId::new(1), CategoryId::new(4)])));
        assert!(query
            .filters
            .contains(&Filter::Languages(vec![Language::English, Language::Uzbek])));
        assert!(query.filters.contains(&Filter::InStock));
        assert!(query.filters.contains(&Filter::PriceRange {
            min: Some(Money::new(1000, Currency::USD)),
            max: None,
        }));
    }

    #[test]
    fn test_params_rejected() {
        let bad_page = BookListParams {
            page_size: Some(101),
            ..BookListParams::default()
        };
        assert!(bad_page.into_query(Currency::USD).is_err());

        let bad_sort = BookListParams {
            sort_by: Some("shoe_size".into()),
            ..BookListParams::default()
        };
        assert!(bad_sort.into_query(Currency::USD).is_err());

        let bad_ids = BookListParams {
            author: Some("1,two".into()),
            ..BookListParams::default()
        };
        assert!(bad_ids.into_query(Currency::USD).is_err());

        let bad_language = BookListParams {
            language: Some("tlh".into()),
            ..BookListParams::default()
        };
        assert!(bad_language.into_query(Currency::USD).is_err());
    }

    #[test]
    fn test_blank_search_leaves_query_empty() {
        let params = BookListParams {
            search: Some("   ".into()),
            ..BookListParams::default()
        };
        assert!(params.into_query(Currency::USD).unwrap().query.is_none());
    }
}
