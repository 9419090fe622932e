//! RPC method handler for the LuxeMarks JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches a method call to the [`AppContext`].

use serde_json::{json, Value};

use crate::app::AppContext;
use crate::services::offline_policy;
use crate::services::transfer::ExportFormat;
use crate::types::bookmark::Bookmark;

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &AppContext, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true, "version": env!("CARGO_PKG_VERSION")})),

        // ─── Bookmarks ───
        "bookmark.add" => {
            let url = params.get("url").and_then(|v| v.as_str()).ok_or("missing url")?;
            let price = params.get("price").and_then(|v| v.as_str());
            let added = app.add_link(url, price).await.map_err(|e| e.to_string())?;
            serde_json::to_value(added).map_err(|e| e.to_string())
        }
        "bookmark.list" => {
            let bookmarks = app.bookmarks().map_err(|e| e.to_string())?;
            serde_json::to_value(bookmarks).map_err(|e| e.to_string())
        }
        "bookmark.update" => {
            let raw = params.get("bookmark").cloned().ok_or("missing bookmark")?;
            let bookmark: Bookmark =
                serde_json::from_value(raw).map_err(|e| format!("invalid bookmark: {}", e))?;
            app.update_bookmark(bookmark).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "bookmark.delete" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            app.delete_bookmark(id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "bookmark.export" => {
            let name = params.get("format").and_then(|v| v.as_str()).unwrap_or("json");
            let format = ExportFormat::parse(name).ok_or_else(|| format!("unsupported export format: {}", name))?;
            let data = app.export(format).map_err(|e| e.to_string())?;
            Ok(json!({"filename": format.file_name(), "data": data}))
        }
        "bookmark.import" => {
            let data = params.get("data").and_then(|v| v.as_str()).ok_or("missing data")?;
            let report = app.import_json(data).map_err(|e| e.to_string())?;
            serde_json::to_value(report).map_err(|e| e.to_string())
        }

        // ─── API key & mode ───
        "apikey.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let saved = app.save_api_key(key).map_err(|e| e.to_string())?;
            Ok(json!({"saved": saved}))
        }
        "apikey.get" => {
            let key = app.api_key().map_err(|e| e.to_string())?;
            if key.is_empty() {
                Ok(json!({"key": null}))
            } else {
                Ok(json!({"key": key}))
            }
        }
        "apikey.clear" => {
            app.clear_api_key().map_err(|e| e.to_string())?;
            Ok(json!({"cleared": true}))
        }
        "mode.toggle_manual" => {
            let mode = app.toggle_manual_mode().map_err(|e| e.to_string())?;
            Ok(json!({"mode": mode}))
        }
        "mode.toggle_key_input" => {
            let shown = app.toggle_key_input().map_err(|e| e.to_string())?;
            Ok(json!({"show_key_input": shown}))
        }
        "state.get" => {
            let snapshot = app.snapshot().map_err(|e| e.to_string())?;
            serde_json::to_value(snapshot).map_err(|e| e.to_string())
        }

        // ─── Offline cache ───
        "cache.manifest" => Ok(json!({
            "name": offline_policy::CACHE_NAME,
            "assets": offline_policy::APP_SHELL_ASSETS,
            "fallback": offline_policy::OFFLINE_FALLBACK,
        })),
        "cache.classify" => {
            let url = params.get("url").and_then(|v| v.as_str()).ok_or("missing url")?;
            let method = params.get("method").and_then(|v| v.as_str()).unwrap_or("GET");
            let navigation = params.get("navigation").and_then(|v| v.as_bool()).unwrap_or(false);
            let policy = offline_policy::classify_request(method, url, navigation);
            Ok(json!({
                "policy": policy,
                "store_on_success": policy.is_some_and(|p| p.should_store(200)),
            }))
        }
        "cache.stale" => {
            let names: Vec<&str> = params
                .get("names")
                .and_then(|v| v.as_array())
                .ok_or("missing names")?
                .iter()
                .filter_map(|v| v.as_str())
                .collect();
            Ok(json!({"stale": offline_policy::stale_caches(&names)}))
        }

        // ─── Settings ───
        "settings.get" => {
            let settings = app.settings().map_err(|e| e.to_string())?;
            serde_json::to_value(settings).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let settings = app.set_setting(key, value).map_err(|e| e.to_string())?;
            serde_json::to_value(settings).map_err(|e| e.to_string())
        }
        "settings.reset" => {
            let settings = app.reset_settings().map_err(|e| e.to_string())?;
            serde_json::to_value(settings).map_err(|e| e.to_string())
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
