//! Catalog browsing, cart and wishlist against an in-memory store.

mod common;

use common::*;
use nest_commerce::prelude::*;

fn shelf_store() -> (Store, CategoryId, AuthorId) {
    let store = store();
    let fiction = store.create_category(&CategoryDraft::new("Science Fiction")).unwrap();
    let herbert = store.create_author(&AuthorDraft::new("Frank Herbert")).unwrap();

    let mut dune = BookDraft::new("Dune", 2_500, 5)
        .with_author(herbert.id)
        .with_category(fiction.id);
    dune.is_featured = true;
    dune.description = "Spice and sandworms.".into();
    store.create_book(&dune).unwrap();

    let messiah = BookDraft::new("Dune Messiah", 1_800, 0)
        .with_author(herbert.id)
        .with_category(fiction.id);
    store.create_book(&messiah).unwrap();

    let mut cookbook = BookDraft::new("Plov at Home", 900, 12);
    cookbook.language = Language::Uzbek;
    cookbook.is_bestseller = true;
    store.create_book(&cookbook).unwrap();

    (store, fiction.id, herbert.id)
}

fn titles(books: &[Book]) -> Vec<&str> {
    books.iter().map(|b| b.title.as_str()).collect()
}

#[test]
fn test_slugs_are_unique() {
    let store = store();
    let first = book(&store, "Dune", 1_000, 1);
    let second = book(&store, "Dune", 1_000, 1);
    assert_eq!(first.slug, "dune");
    assert_eq!(second.slug, "dune-1");
}

#[test]
fn test_filters_and_sorting() {
    let (store, fiction, herbert) = shelf_store();

    let query = SearchQuery::new().with_filter(Filter::category(fiction));
    let page = store.list_books(&query).unwrap();
    assert_eq!(page.pagination.total, 2);

    let query = SearchQuery::new()
        .with_filter(Filter::Authors(vec![herbert]))
        .with_filter(Filter::in_stock());
    assert_eq!(titles(&store.list_books(&query).unwrap().items), vec!["Dune"]);

    let query = SearchQuery::new().with_sort(SortOption::PriceAsc);
    assert_eq!(
        titles(&store.list_books(&query).unwrap().items),
        vec!["Plov at Home", "Dune Messiah", "Dune"]
    );

    let query = SearchQuery::new().with_filter(Filter::price_range(
        Some(Money::new(1_000, Currency::USD)),
        Some(Money::new(2_000, Currency::USD)),
    ));
    assert_eq!(titles(&store.list_books(&query).unwrap().items), vec!["Dune Messiah"]);

    let query = SearchQuery::new().with_filter(Filter::Languages(vec![Language::Uzbek]));
    assert_eq!(titles(&store.list_books(&query).unwrap().items), vec!["Plov at Home"]);
}

#[test]
fn test_pagination() {
    let (store, _, _) = shelf_store();
    let query = SearchQuery::new()
        .with_sort(SortOption::TitleAsc)
        .with_pagination(2, 2);
    let page = store.list_books(&query).unwrap();
    assert_eq!(titles(&page.items), vec!["Plov at Home"]);
    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.pagination.total_pages, 2);
    assert!(!page.pagination.has_next);
    assert!(page.pagination.has_prev);
}

#[test]
fn test_search() {
    let (store, _, _) = shelf_store();

    let hits = store.search_books(SearchQuery::new().with_query("herbert")).unwrap();
    assert_eq!(hits.len(), 2);

    let hits = store.search_books(SearchQuery::new().with_query("sandworms")).unwrap();
    assert_eq!(titles(&hits.items), vec!["Dune"]);

    let err = store.search_books(SearchQuery::new().with_query("  ")).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_search_wildcards_match_literally() {
    let (store, _, _) = shelf_store();
    store.create_book(&BookDraft::new("100% Plov", 700, 3)).unwrap();
    store.create_book(&BookDraft::new("snake_case Poems", 700, 3)).unwrap();

    let hits = store.search_books(SearchQuery::new().with_query("%")).unwrap();
    assert_eq!(titles(&hits.items), vec!["100% Plov"]);

    let hits = store.search_books(SearchQuery::new().with_query("_")).unwrap();
    assert_eq!(titles(&hits.items), vec!["snake_case Poems"]);
}

#[test]
fn test_shelves() {
    let (store, _, _) = shelf_store();
    assert_eq!(titles(&store.featured_books(None).unwrap()), vec!["Dune"]);
    assert_eq!(titles(&store.bestsellers(None).unwrap()), vec!["Plov at Home"]);
    assert_eq!(store.new_arrivals(Some(2)).unwrap().len(), 2);
}

#[test]
fn test_related_books_share_author_or_category() {
    let (store, _, _) = shelf_store();
    let dune = store.view_book_by_slug("dune").unwrap();
    let related = store.related_books(dune.id, None).unwrap();
    assert_eq!(titles(&related), vec!["Dune Messiah"]);
}

#[test]
fn test_views_are_counted() {
    let store = store();
    let book = book(&store, "Watched", 1_000, 1);
    store.view_book(book.id).unwrap();
    let seen = store.view_book_by_slug("watched").unwrap();
    assert_eq!(seen.view_count, 2);
    assert!(matches!(
        store.view_book_by_slug("unknown").unwrap_err(),
        CommerceError::BookSlugNotFound(_)
    ));
}

#[test]
fn test_soft_delete_hides_book() {
    let store = store();
    let book = book(&store, "Gone", 1_000, 1);
    store.delete_book(book.id).unwrap();

    assert!(store.book(book.id).unwrap_err().is_not_found());
    assert!(store.list_books(&SearchQuery::new()).unwrap().is_empty());
    assert!(store.delete_book(book.id).unwrap_err().is_not_found());
}

#[test]
fn test_book_references_checked() {
    let store = store();
    let draft = BookDraft::new("Orphan", 1_000, 1).with_author(AuthorId::new(77));
    assert!(matches!(
        store.create_book(&draft).unwrap_err(),
        CommerceError::AuthorNotFound(_)
    ));
}

#[test]
fn test_category_book_counts() {
    let (store, _, _) = shelf_store();
    let categories = store.list_categories().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].slug, "science-fiction");
    assert_eq!(categories[0].book_count, 2);

    let author = store.author_by_slug("frank-herbert").unwrap();
    assert_eq!(author.book_count, 2);
}

#[test]
fn test_inactive_category_hidden() {
    let store = store();
    let mut draft = CategoryDraft::new("Drafts");
    store.create_category(&draft).unwrap();
    draft.is_active = false;
    store.update_category("drafts", &draft).unwrap();

    assert!(store.list_categories().unwrap().is_empty());
    assert!(store.category_by_slug("drafts").unwrap_err().is_not_found());
}

#[test]
fn test_cart_merges_lines_and_checks_stock() {
    let store = store();
    let alice = user(&store, "alice");
    let book = book(&store, "Limited", 1_000, 3);

    store.add_to_cart(alice, book.id, 2).unwrap();
    let cart = store.add_to_cart(alice, book.id, 1).unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.item_count(), 3);

    let err = store.add_to_cart(alice, book.id, 1).unwrap_err();
    assert!(matches!(err, CommerceError::InsufficientStock { .. }));

    let line = cart.items[0].id;
    let cart = store.update_cart_item(alice, line, 0).unwrap();
    assert!(cart.is_empty());
}

#[test]
fn test_cart_lines_are_private() {
    let store = store();
    let alice = user(&store, "alice");
    let bob = user(&store, "bob");
    let book = book(&store, "Mine", 1_000, 3);

    let cart = store.add_to_cart(alice, book.id, 1).unwrap();
    let line = cart.items[0].id;
    assert!(matches!(
        store.remove_cart_item(bob, line).unwrap_err(),
        CommerceError::CartItemNotFound(_)
    ));

    let cart = store.clear_cart(alice).unwrap();
    assert!(cart.is_empty());
}

#[test]
fn test_wishlist_toggle() {
    let store = store();
    let alice = user(&store, "alice");
    let book = book(&store, "Wanted", 1_000, 0);

    assert!(store.toggle_wishlist(alice, book.id).unwrap().in_wishlist);
    let items = store.wishlist(alice).unwrap();
    assert_eq!(items.len(), 1);
    assert!(!items[0].in_stock);

    assert!(!store.toggle_wishlist(alice, book.id).unwrap().in_wishlist);
    assert!(store.wishlist(alice).unwrap().is_empty());

    assert!(store
        .toggle_wishlist(alice, BookId::new(999))
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_default_address_is_exclusive() {
    let store = store();
    let alice = user(&store, "alice");
    let draft = AddressDraft {
        full_name: "Alice A".into(),
        phone: "+998900000000".into(),
        address_line1: "7 Amir Temur".into(),
        city: "Tashkent".into(),
        postal_code: "100000".into(),
        is_default: true,
        ..AddressDraft::default()
    };
    let first = store.create_address(alice, &draft).unwrap();
    let second = store.create_address(alice, &draft).unwrap();
    assert_eq!(second.country, "Uzbekistan");

    let addresses = store.addresses(alice).unwrap();
    assert_eq!(addresses.iter().filter(|a| a.is_default).count(), 1);
    assert_eq!(addresses[0].id, second.id);

    store.set_default_address(alice, first.id).unwrap();
    let addresses = store.addresses(alice).unwrap();
    assert_eq!(addresses[0].id, first.id);
    assert!(!addresses[1].is_default);
}
