//! Property-based tests for JSON export/import.
//!
//! Exporting a collection and importing it into an empty collection restores
//! every field; importing it back into the same collection adds nothing.

use luxemarks::services::transfer::{export_json, parse_import};
use luxemarks::types::bookmark::Bookmark;
use proptest::prelude::*;

fn arb_bookmark() -> impl Strategy<Value = Bookmark> {
    (
        "[a-f0-9]{8}",
        "[a-z][a-z0-9]{2,12}",
        "[A-Za-z][A-Za-z0-9 |,\"'-]{0,40}",
        prop_oneof![Just("$19.99".to_string()), Just("₹1,299".to_string()), Just("Check Price".to_string()), Just(String::new())],
        prop_oneof![Just("Amazon"), Just("Flipkart"), Just("Web Store"), Just("Link")],
        0i64..4_000_000_000_000,
        any::<bool>(),
    )
        .prop_map(|(id, host, title, price, store, timestamp, loading)| Bookmark {
            id,
            url: format!("https://{}.com/item", host),
            title,
            price,
            store: store.to_string(),
            timestamp,
            loading,
        })
}

/// Collections with unique IDs.
fn arb_collection() -> impl Strategy<Value = Vec<Bookmark>> {
    proptest::collection::vec(arb_bookmark(), 0..15).prop_map(|mut items| {
        let mut seen = std::collections::HashSet::new();
        items.retain(|b| seen.insert(b.id.clone()));
        items
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn export_then_import_restores_every_field(bookmarks in arb_collection()) {
        let text = export_json(&bookmarks).unwrap();

        let batch = parse_import(&[], &text, 0).unwrap();

        prop_assert_eq!(batch.skipped, 0);
        prop_assert_eq!(batch.accepted, bookmarks);
    }

    #[test]
    fn reimport_into_same_collection_adds_nothing(bookmarks in arb_collection()) {
        let text = export_json(&bookmarks).unwrap();

        let batch = parse_import(&bookmarks, &text, 0).unwrap();

        prop_assert!(batch.accepted.is_empty());
        prop_assert_eq!(batch.skipped, bookmarks.len());
    }
}
