//! Unit tests for the BookmarkManager public API.
//!
//! These tests exercise the newest-first collection through the
//! `BookmarkManagerTrait` interface.

use luxemarks::managers::bookmark_manager::{
    BookmarkManager, BookmarkManagerTrait, Placeholder, FAILED_PRICE, FAILED_STORE,
};
use luxemarks::types::bookmark::Bookmark;
use luxemarks::types::errors::BookmarkError;

const LOADING: Placeholder<'static> = Placeholder {
    title: "Fetching details from web...",
    price: "...",
    store: "Loading...",
};

fn bookmark(id: &str) -> Bookmark {
    Bookmark {
        id: id.to_string(),
        url: format!("https://shop.example.com/{}", id),
        title: format!("Item {}", id),
        price: "$1.00".to_string(),
        store: "Web Store".to_string(),
        timestamp: 1_700_000_000_000,
        loading: false,
    }
}

#[test]
fn test_placeholder_is_loading_and_first() {
    let mut mgr = BookmarkManager::from_bookmarks(vec![bookmark("old")]);

    let id = mgr.insert_placeholder("https://www.amazon.com/dp/B09XS7JWHH", LOADING);

    let first = &mgr.list_bookmarks()[0];
    assert_eq!(first.id, id);
    assert!(first.loading);
    assert_eq!(first.title, "Fetching details from web...");
    assert_eq!(first.price, "...");
    assert!(first.timestamp > 0);
    assert_eq!(mgr.bookmark_count(), 2);
}

#[test]
fn test_apply_details_clears_loading() {
    let mut mgr = BookmarkManager::new();
    let id = mgr.insert_placeholder("https://www.bestbuy.com/site/1", LOADING);

    mgr.apply_details(&id, "Sony WH-1000XM5", Some("$348.00"), "Web Store")
        .unwrap();

    let bm = mgr.get_bookmark(&id).unwrap();
    assert_eq!(bm.title, "Sony WH-1000XM5");
    assert_eq!(bm.price, "$348.00");
    assert!(!bm.loading);
}

#[test]
fn test_apply_details_without_price_keeps_manual_price() {
    let mut mgr = BookmarkManager::new();
    let id = mgr.insert_placeholder(
        "https://www.myntra.com/1",
        Placeholder { title: "Fetching title...", price: "₹999", store: "Loading..." },
    );

    mgr.apply_details(&id, "Roadster Tee", None, "Myntra").unwrap();

    let bm = mgr.get_bookmark(&id).unwrap();
    assert_eq!(bm.price, "₹999");
    assert_eq!(bm.store, "Myntra");
}

#[test]
fn test_mark_failed_uses_url_as_title() {
    let mut mgr = BookmarkManager::new();
    let url = "https://shop.example.com/broken";
    let id = mgr.insert_placeholder(url, LOADING);

    mgr.mark_failed(&id).unwrap();

    let bm = mgr.get_bookmark(&id).unwrap();
    assert_eq!(bm.title, url);
    assert_eq!(bm.store, FAILED_STORE);
    assert_eq!(bm.price, FAILED_PRICE);
    assert!(!bm.loading);
}

#[test]
fn test_update_replaces_matching_bookmark_only() {
    let mut mgr = BookmarkManager::from_bookmarks(vec![bookmark("1"), bookmark("2")]);
    let mut edited = bookmark("2");
    edited.price = "$2.50".to_string();

    mgr.update_bookmark(edited.clone()).unwrap();

    assert_eq!(mgr.get_bookmark("2"), Some(&edited));
    assert_eq!(mgr.get_bookmark("1"), Some(&bookmark("1")));
}

#[test]
fn test_missing_ids_are_errors() {
    let mut mgr = BookmarkManager::new();
    assert_eq!(
        mgr.remove_bookmark("nope").unwrap_err(),
        BookmarkError::NotFound("nope".to_string())
    );
    assert!(mgr.update_bookmark(bookmark("nope")).is_err());
    assert!(mgr.apply_details("nope", "t", None, "s").is_err());
    assert!(mgr.mark_failed("nope").is_err());
}

#[test]
fn test_add_rejects_duplicate_id() {
    let mut mgr = BookmarkManager::from_bookmarks(vec![bookmark("1")]);
    assert_eq!(
        mgr.add_bookmark(bookmark("1")).unwrap_err(),
        BookmarkError::DuplicateId("1".to_string())
    );
    mgr.add_bookmark(bookmark("2")).unwrap();
    assert_eq!(mgr.list_bookmarks()[0].id, "2");
}

#[test]
fn test_prepend_all_keeps_batch_order() {
    let mut mgr = BookmarkManager::from_bookmarks(vec![bookmark("old")]);

    let added = mgr.prepend_all(vec![bookmark("a"), bookmark("b")]).unwrap();

    let ids: Vec<&str> = mgr.list_bookmarks().iter().map(|b| b.id.as_str()).collect();
    assert_eq!(added, 2);
    assert_eq!(ids, vec!["a", "b", "old"]);
}

#[test]
fn test_prepend_all_is_all_or_nothing() {
    let mut mgr = BookmarkManager::from_bookmarks(vec![bookmark("1")]);

    assert!(mgr.prepend_all(vec![bookmark("2"), bookmark("1")]).is_err());
    assert!(mgr.prepend_all(vec![bookmark("3"), bookmark("3")]).is_err());
    assert_eq!(mgr.bookmark_count(), 1);
}

#[test]
fn test_remove_returns_bookmark() {
    let mut mgr = BookmarkManager::from_bookmarks(vec![bookmark("1"), bookmark("2")]);
    let removed = mgr.remove_bookmark("1").unwrap();
    assert_eq!(removed.id, "1");
    assert_eq!(mgr.bookmark_count(), 1);
}
