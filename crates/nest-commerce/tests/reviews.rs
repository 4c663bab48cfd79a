//! Review writes and the book rating rollup.

mod common;

use common::*;
use nest_commerce::prelude::*;
use nest_commerce::store::recompute_book_rating;

fn draft(book: BookId, rating: i64) -> ReviewDraft {
    ReviewDraft::new(book, rating, "Worth reading", "A thoughtful and well paced book.")
}

#[test]
fn test_rating_rolls_up_on_create() {
    let store = store();
    let book = book(&store, "Dune", 2_000, 5);
    for (name, rating) in [("ann", 5), ("ben", 4), ("cat", 4)] {
        let reviewer = user(&store, name);
        store.create_review(reviewer, &draft(book.id, rating)).unwrap();
    }

    let book = store.book(book.id).unwrap();
    assert_eq!(book.review_count, 3);
    assert_eq!(book.rating, 4.33);
}

#[test]
fn test_deleting_last_review_resets_rating() {
    let store = store();
    let ann = user(&store, "ann");
    let book = book(&store, "Solo", 2_000, 5);

    let review = store.create_review(ann, &draft(book.id, 3)).unwrap();
    assert_eq!(store.book(book.id).unwrap().rating, 3.0);

    store.delete_review(ann, review.id, false).unwrap();
    let book = store.book(book.id).unwrap();
    assert_eq!(book.rating, 0.0);
    assert_eq!(book.review_count, 0);
}

#[test]
fn test_update_recomputes_rating() {
    let store = store();
    let ann = user(&store, "ann");
    let ben = user(&store, "ben");
    let book = book(&store, "Edited", 2_000, 5);

    let review = store.create_review(ann, &draft(book.id, 1)).unwrap();
    store.create_review(ben, &draft(book.id, 4)).unwrap();
    assert_eq!(store.book(book.id).unwrap().rating, 2.5);

    let update = ReviewUpdate {
        rating: Some(5),
        ..ReviewUpdate::default()
    };
    let updated = store.update_review(ann, review.id, &update).unwrap();
    assert_eq!(updated.rating, 5);
    assert_eq!(updated.title, "Worth reading");
    assert_eq!(store.book(book.id).unwrap().rating, 4.5);
}

#[test]
fn test_duplicate_review_rejected() {
    let store = store();
    let ann = user(&store, "ann");
    let book = book(&store, "Twice", 2_000, 5);

    store.create_review(ann, &draft(book.id, 4)).unwrap();
    let err = store.create_review(ann, &draft(book.id, 2)).unwrap_err();
    assert!(matches!(err, CommerceError::DuplicateReview));
    assert_eq!(store.book(book.id).unwrap().review_count, 1);
}

#[test]
fn test_invalid_review_rejected() {
    let store = store();
    let ann = user(&store, "ann");
    let book = book(&store, "Strict", 2_000, 5);

    let short = ReviewDraft::new(book.id, 4, "Ok", "A thoughtful and well paced book.");
    assert!(store.create_review(ann, &short).unwrap_err().is_validation());
    assert!(store.create_review(ann, &draft(book.id, 6)).unwrap_err().is_validation());
    assert!(store.create_review(ann, &draft(BookId::new(999), 4)).unwrap_err().is_not_found());
}

#[test]
fn test_only_author_edits_but_staff_may_delete() {
    let store = store();
    let ann = user(&store, "ann");
    let ben = user(&store, "ben");
    let book = book(&store, "Owned", 2_000, 5);
    let review = store.create_review(ann, &draft(book.id, 4)).unwrap();

    let update = ReviewUpdate {
        comment: Some("Changed my mind about this one.".into()),
        ..ReviewUpdate::default()
    };
    assert!(store.update_review(ben, review.id, &update).unwrap_err().is_forbidden());
    assert!(store.delete_review(ben, review.id, false).unwrap_err().is_forbidden());

    store.delete_review(ben, review.id, true).unwrap();
    assert!(matches!(
        store.review(review.id).unwrap_err(),
        CommerceError::ReviewNotFound(_)
    ));
}

#[test]
fn test_verified_purchase_requires_delivery() {
    let store = store();
    let ann = user(&store, "ann");
    let ben = user(&store, "ben");
    let book = book(&store, "Bought", 2_000, 5);

    for reviewer in [ann, ben] {
        store.add_to_cart(reviewer, book.id, 1).unwrap();
        store.create_order(reviewer, &checkout()).unwrap();
    }
    let ann_order = store.orders(ann).unwrap()[0].id;
    store
        .update_order_status(ann_order, &StatusUpdate::new(OrderStatus::Delivered))
        .unwrap();

    let verified = store.create_review(ann, &draft(book.id, 5)).unwrap();
    let unverified = store.create_review(ben, &draft(book.id, 3)).unwrap();
    assert!(verified.is_verified_purchase);
    assert!(!unverified.is_verified_purchase);
    assert_eq!(verified.username, "ann");
}

#[test]
fn test_reviews_listed_newest_first() {
    let store = store();
    let book = book(&store, "Listed", 2_000, 5);
    let mut ids = Vec::new();
    for name in ["ann", "ben", "cat"] {
        let reviewer = user(&store, name);
        ids.push(store.create_review(reviewer, &draft(book.id, 4)).unwrap().id);
    }

    let listed: Vec<_> = store
        .reviews_for_book(book.id)
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    ids.reverse();
    assert_eq!(listed, ids);
}

#[test]
fn test_mark_helpful() {
    let store = store();
    let ann = user(&store, "ann");
    let book = book(&store, "Helpful", 2_000, 5);
    let review = store.create_review(ann, &draft(book.id, 4)).unwrap();

    store.mark_review_helpful(review.id).unwrap();
    let review = store.mark_review_helpful(review.id).unwrap();
    assert_eq!(review.helpful_count, 2);

    assert!(store.mark_review_helpful(ReviewId::new(404)).unwrap_err().is_not_found());
}

#[test]
fn test_recompute_is_idempotent() {
    let store = store();
    let ann = user(&store, "ann");
    let book = book(&store, "Stable", 2_000, 5);
    store.create_review(ann, &draft(book.id, 4)).unwrap();

    let first = recompute_book_rating(store.db(), book.id).unwrap();
    let second = recompute_book_rating(store.db(), book.id).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.count, 1);
    assert_eq!(first.average, 4.0);
}
