//! Unit tests for the tier cascade in `PriceResolver`, driven through a
//! scripted transport so every outgoing request can be inspected.

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use serde_json::json;

use common::{allorigins, ScriptedTransport};
use luxemarks::services::price_resolver::PriceResolver;
use luxemarks::types::bookmark::PRICE_PLACEHOLDER;
use luxemarks::types::errors::LookupError;
use luxemarks::types::settings::LookupSettings;

const AMAZON_URL: &str = "https://www.amazon.com/Sony-Headphones/dp/B09XS7JWHH/ref=sr_1_1";
const BESTBUY_URL: &str = "https://www.bestbuy.com/site/sony-headphones/6505727.p";
const FLIPKART_URL: &str = "https://www.flipkart.com/apple-iphone-15/p/itm6ac6485515ae4";

const MARKETPLACE: &[&str] = &["allorigins", "engine=amazon_product"];
const SEARCH: &[&str] = &["allorigins", "engine=google&"];
const SHOPPING: &[&str] = &["allorigins", "engine=google_shopping"];

fn resolver(transport: &Arc<ScriptedTransport>) -> PriceResolver {
    PriceResolver::new(transport.clone(), &LookupSettings::default())
}

fn wrapped(payload: serde_json::Value) -> String {
    allorigins(&payload)
}

#[tokio::test]
async fn test_non_marketplace_url_skips_direct_tier() {
    let transport = Arc::new(ScriptedTransport::new().route(
        SEARCH,
        200,
        &wrapped(json!({"organic_results": [{
            "title": "Sony WH-1000XM5 | Best Buy",
            "snippet": "Wireless noise canceling. $348.00 at Best Buy."
        }]})),
    ));

    let details = resolver(&transport).resolve(BESTBUY_URL, "key").await.unwrap();

    assert_eq!(details.title, "Sony WH-1000XM5");
    assert_eq!(details.price, "$348.00");
    assert_eq!(details.store, "Web Store");
    assert_eq!(transport.count_matching("engine=amazon_product"), 0);
}

#[tokio::test]
async fn test_marketplace_link_without_asin_skips_direct_tier() {
    let transport = Arc::new(ScriptedTransport::new().route(
        SEARCH,
        200,
        &wrapped(json!({"organic_results": [{"title": "Echo Dot", "snippet": "Now $49.99"}]})),
    ));

    let details = resolver(&transport)
        .resolve("https://www.amazon.com/s?k=echo+dot", "key")
        .await
        .unwrap();

    assert_eq!(details.price, "$49.99");
    assert_eq!(details.store, "Amazon");
    assert_eq!(transport.count_matching("engine=amazon_product"), 0);
}

#[tokio::test]
async fn test_marketplace_price_finishes_immediately() {
    let transport = Arc::new(ScriptedTransport::new().route(
        MARKETPLACE,
        200,
        &wrapped(json!({"product_result": {
            "title": "Sony WH-1000XM5 Wireless Headphones",
            "buybox_winner": {"price": "$328.00"}
        }})),
    ));

    let details = resolver(&transport).resolve(AMAZON_URL, "key").await.unwrap();

    assert_eq!(details.title, "Sony WH-1000XM5 Wireless Headphones");
    assert_eq!(details.price, "$328.00");
    assert_eq!(details.store, "Amazon");
    assert_eq!(transport.count_matching("engine=google"), 0);
    assert_eq!(transport.count_matching("product_id=B09XS7JWHH"), 1);
    assert_eq!(transport.count_matching("domain=amazon.com"), 1);
}

#[tokio::test]
async fn test_marketplace_placeholder_falls_through_to_search() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .route(MARKETPLACE, 200, &wrapped(json!({"product_result": {"title": "Sony WH-1000XM5"}})))
            .route(
                SEARCH,
                200,
                &wrapped(json!({"organic_results": [{
                    "title": "Sony WH-1000XM5 - Amazon.com",
                    "snippet": "Deal of the day: $329.99"
                }]})),
            ),
    );

    let details = resolver(&transport).resolve(AMAZON_URL, "key").await.unwrap();

    assert_eq!(details.title, "Sony WH-1000XM5");
    assert_eq!(details.price, "$329.99");
    assert_eq!(details.store, "Amazon");
    assert_eq!(transport.count_matching("engine=amazon_product"), 1);
    assert_eq!(transport.count_matching("engine=google&"), 1);
}

#[tokio::test]
async fn test_search_failure_aborts_without_refinement_tiers() {
    let transport = Arc::new(ScriptedTransport::new());

    let err = resolver(&transport).resolve(BESTBUY_URL, "key").await.unwrap_err();

    assert!(matches!(err, LookupError::Exhausted(_)));
    assert!(err.to_string().to_lowercase().contains("all api proxies failed"));
    assert_eq!(transport.count_matching("engine=google_shopping"), 0);
    // One attempt per relay for the search tier, nothing else.
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_invalid_key_surfaces_in_error() {
    let transport = Arc::new(ScriptedTransport::new().route(
        &["allorigins", "serpapi.com"],
        200,
        &wrapped(json!({"error": "Invalid API key. Your API key should be here: https://serpapi.com/manage-api-key"})),
    ));

    let err = resolver(&transport).resolve(AMAZON_URL, "bad").await.unwrap_err();

    assert!(err.to_string().to_lowercase().contains("invalid api key"));
    assert_eq!(transport.count_matching("corsproxy"), 0);
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_empty_search_results_abort() {
    let transport = Arc::new(ScriptedTransport::new().route(SEARCH, 200, &wrapped(json!({"organic_results": []}))));

    let err = resolver(&transport).resolve(BESTBUY_URL, "key").await.unwrap_err();
    assert!(err.to_string().contains("No search results found"));
}

#[tokio::test]
async fn test_shopping_tier_supplies_price() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .route(
                SEARCH,
                200,
                &wrapped(json!({"organic_results": [{
                    "title": "Great Headphones - BrandStore | Deals",
                    "snippet": "Over-ear wireless headphones."
                }]})),
            )
            .route(SHOPPING, 200, &wrapped(json!({"shopping_results": [{"price": "$59.00"}]}))),
    );

    let details = resolver(&transport).resolve(BESTBUY_URL, "key").await.unwrap();

    assert_eq!(details.title, "Great Headphones - BrandStore");
    assert_eq!(details.price, "$59.00");
    assert_eq!(transport.count_matching("q=Great+Headphones&"), 1);
}

#[tokio::test]
async fn test_scrape_tier_formats_rupees() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .route(
                SEARCH,
                200,
                &wrapped(json!({"organic_results": [{"title": "Apple iPhone 15 (Black, 128 GB)"}]})),
            )
            .route(SHOPPING, 200, &wrapped(json!({"shopping_results": []})))
            .route(
                &["corsproxy.io/?https://www.flipkart.com"],
                200,
                r#"<html><head><meta property="og:price:amount" content="72999"></head></html>"#,
            ),
    );

    let details = resolver(&transport).resolve(FLIPKART_URL, "key").await.unwrap();

    assert_eq!(details.title, "Apple iPhone 15 (Black, 128 GB)");
    assert_eq!(details.price, "₹72999");
    assert_eq!(details.store, "Flipkart");
    assert_eq!(transport.count_matching("gl=in"), 2);
}

#[tokio::test]
async fn test_no_price_anywhere_keeps_placeholder() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .route(SEARCH, 200, &wrapped(json!({"organic_results": [{"title": "Mystery Gadget"}]})))
            .route(SHOPPING, 200, &wrapped(json!({})))
            .route(&["corsproxy.io/?https://www.bestbuy.com"], 404, "Not Found"),
    );

    let details = resolver(&transport).resolve(BESTBUY_URL, "key").await.unwrap();

    assert_eq!(details.title, "Mystery Gadget");
    assert_eq!(details.price, PRICE_PLACEHOLDER);
}

#[tokio::test]
async fn test_shopping_transport_failure_falls_through_to_scrape() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .route(
                SEARCH,
                200,
                &wrapped(json!({"organic_results": [{"title": "Apple iPhone 15 (Black, 128 GB)"}]})),
            )
            .fail(
                &["engine=google_shopping"],
                LookupError::Transport("connection reset".to_string()),
            )
            .route(
                &["corsproxy.io/?https://www.flipkart.com"],
                200,
                r#"<html><head><meta property="og:price:amount" content="72999"></head></html>"#,
            ),
    );

    let details = resolver(&transport).resolve(FLIPKART_URL, "key").await.unwrap();

    assert_eq!(details.price, "₹72999");
    assert_eq!(transport.count_matching("engine=google_shopping"), 2);
}

#[tokio::test]
async fn test_shopping_upstream_error_falls_through_to_scrape() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .route(SEARCH, 200, &wrapped(json!({"organic_results": [{"title": "Desk Lamp"}]})))
            .route(
                SHOPPING,
                200,
                &wrapped(json!({"error": "Your account has run out of searches."})),
            )
            .route(
                &["corsproxy.io/?https://www.bestbuy.com"],
                200,
                r#"<html><head><meta property="product:price:amount" content="25.00"></head></html>"#,
            ),
    );

    let details = resolver(&transport).resolve(BESTBUY_URL, "key").await.unwrap();

    assert_eq!(details.title, "Desk Lamp");
    assert_eq!(details.price, "$25.00");
    assert_eq!(transport.count_matching("corsproxy.io/?https://www.bestbuy.com"), 1);
}
