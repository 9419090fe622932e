//! Bookmark import and export.
//!
//! Export writes CSV (`Title,Price,Store,Date,URL`, every field quoted) or a
//! pretty-printed JSON array. Import reads a JSON array, keeps entries that
//! carry a URL and a title, and skips entries whose ID is already taken.

use std::collections::HashSet;

use chrono::DateTime;
use csv::{QuoteStyle, WriterBuilder};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::services::price_extraction::value_text;
use crate::services::region::store_label;
use crate::types::bookmark::Bookmark;
use crate::types::errors::TransferError;

/// Export formats offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "luxemarks.csv",
            ExportFormat::Json => "luxemarks.json",
        }
    }
}

/// Entries accepted from an import file plus how many were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBatch {
    /// Accepted bookmarks, in file order.
    pub accepted: Vec<Bookmark>,
    pub skipped: usize,
}

/// Calendar date (UTC) of an epoch-millisecond timestamp.
fn format_date(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn export_csv(bookmarks: &[Bookmark]) -> Result<String, TransferError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer
        .write_record(["Title", "Price", "Store", "Date", "URL"])
        .map_err(|e| TransferError::ExportFailed(e.to_string()))?;
    for b in bookmarks {
        let date = format_date(b.timestamp);
        writer
            .write_record([
                b.title.as_str(),
                b.price.as_str(),
                b.store.as_str(),
                date.as_str(),
                b.url.as_str(),
            ])
            .map_err(|e| TransferError::ExportFailed(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| TransferError::ExportFailed(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| TransferError::ExportFailed(e.to_string()))
}

pub fn export_json(bookmarks: &[Bookmark]) -> Result<String, TransferError> {
    serde_json::to_string_pretty(bookmarks).map_err(|e| TransferError::ExportFailed(e.to_string()))
}

fn non_empty_str<'a>(entry: &'a Value, field: &str) -> Option<&'a str> {
    entry
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Reads an import file against the current collection.
///
/// `now_ms` stamps entries that carry no timestamp.
pub fn parse_import(existing: &[Bookmark], text: &str, now_ms: i64) -> Result<ImportBatch, TransferError> {
    let parsed: Value =
        serde_json::from_str(text).map_err(|e| TransferError::InvalidJson(e.to_string()))?;
    let Value::Array(entries) = parsed else {
        return Err(TransferError::NotAnArray);
    };

    let mut taken: HashSet<String> = existing.iter().map(|b| b.id.clone()).collect();
    let mut accepted = Vec::new();
    let mut skipped = 0;

    for entry in &entries {
        let (Some(url), Some(title)) = (non_empty_str(entry, "url"), non_empty_str(entry, "title")) else {
            debug!("Skipping import entry without url or title");
            skipped += 1;
            continue;
        };

        let id = match entry.get("id") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        if !taken.insert(id.clone()) {
            debug!(id = %id, "Skipping import entry with duplicate id");
            skipped += 1;
            continue;
        }

        accepted.push(Bookmark {
            id,
            url: url.to_string(),
            title: title.to_string(),
            price: entry.get("price").and_then(value_text).unwrap_or_default(),
            store: non_empty_str(entry, "store")
                .unwrap_or_else(|| store_label(url))
                .to_string(),
            timestamp: entry
                .get("timestamp")
                .and_then(Value::as_i64)
                .unwrap_or(now_ms),
            loading: entry.get("loading").and_then(Value::as_bool).unwrap_or(false),
        });
    }

    info!(imported = accepted.len(), skipped, "Parsed import file");
    Ok(ImportBatch { accepted, skipped })
}
