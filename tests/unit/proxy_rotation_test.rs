//! Unit tests for relay rotation over a scripted transport.

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use serde_json::json;

use common::{allorigins, ScriptedTransport};
use luxemarks::services::proxy_rotation::ProxyRotator;
use luxemarks::types::errors::LookupError;
use luxemarks::types::settings::LookupSettings;

const TARGET: &str = "https://serpapi.com/search.json?engine=google&q=x&api_key=k";

fn rotator(transport: Arc<ScriptedTransport>) -> ProxyRotator {
    ProxyRotator::new(transport, LookupSettings::default().proxies)
}

#[tokio::test]
async fn test_first_proxy_500_second_succeeds() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .route(&["allorigins"], 500, "Internal Server Error")
            .route_json(&["corsproxy"], &json!({"organic_results": [{"title": "Widget"}]})),
    );

    let data = rotator(transport.clone()).fetch_json(TARGET).await.unwrap();

    assert_eq!(data["organic_results"][0]["title"], "Widget");
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_allorigins_contents_are_unwrapped() {
    let payload = json!({"shopping_results": [{"price": "$19.99"}]});
    let transport = Arc::new(ScriptedTransport::new().route(&["allorigins"], 200, &allorigins(&payload)));

    let data = rotator(transport.clone()).fetch_json(TARGET).await.unwrap();

    assert_eq!(data, payload);
    assert_eq!(transport.count_matching("corsproxy"), 0);
}

#[tokio::test]
async fn test_empty_error_field_counts_as_success() {
    let payload = json!({"error": "", "organic_results": [{"title": "Widget"}]});
    let transport = Arc::new(ScriptedTransport::new().route(&["allorigins"], 200, &allorigins(&payload)));

    let data = rotator(transport.clone()).fetch_json(TARGET).await.unwrap();

    assert_eq!(data["organic_results"][0]["title"], "Widget");
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_api_key_error_stops_rotation() {
    let payload = json!({"error": "Invalid API key. Your API key should be here: https://serpapi.com/manage-api-key"});
    let transport = Arc::new(
        ScriptedTransport::new()
            .route(&["allorigins"], 200, &allorigins(&payload))
            .route_json(&["corsproxy"], &json!({"organic_results": []})),
    );

    let err = rotator(transport.clone()).fetch_json(TARGET).await.unwrap_err();

    assert!(matches!(err, LookupError::Upstream(_)));
    assert!(err.to_string().starts_with("Invalid API key."));
    assert_eq!(transport.count_matching("corsproxy"), 0);
}

#[tokio::test]
async fn test_all_proxies_failed_names_last_error() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .route(&["allorigins"], 502, "")
            .route(&["corsproxy"], 200, "<html>not json</html>"),
    );

    let err = rotator(transport).fetch_json(TARGET).await.unwrap_err();

    match &err {
        LookupError::AllProxiesFailed(last) => assert!(last.starts_with("Invalid response")),
        other => panic!("expected AllProxiesFailed, got {:?}", other),
    }
    assert!(err.to_string().to_lowercase().contains("all api proxies failed"));
}

#[tokio::test]
async fn test_transport_error_advances() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .fail(&["allorigins"], LookupError::Transport("connection reset".to_string()))
            .route_json(&["corsproxy"], &json!({"ok": true})),
    );

    let data = rotator(transport).fetch_json(TARGET).await.unwrap();
    assert_eq!(data, json!({"ok": true}));
}

#[tokio::test]
async fn test_allorigins_without_contents_advances() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .route_json(&["allorigins"], &json!({"status": {"http_code": 404}}))
            .route_json(&["corsproxy"], &json!({"ok": true})),
    );

    let data = rotator(transport.clone()).fetch_json(TARGET).await.unwrap();
    assert_eq!(data, json!({"ok": true}));
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_empty_proxy_list() {
    let transport = Arc::new(ScriptedTransport::new());
    let err = ProxyRotator::new(transport, Vec::new())
        .fetch_json(TARGET)
        .await
        .unwrap_err();
    assert_eq!(err, LookupError::NoProxies);
}
