use serde::{Deserialize, Serialize};

/// Placeholder shown as the price when no lookup tier produced one.
pub const PRICE_PLACEHOLDER: &str = "Check Price";

/// A saved product link.
///
/// `price` is a display string that already carries its currency symbol.
/// `timestamp` is the creation time in epoch milliseconds. `loading` is true
/// only while the detail lookup for this bookmark is in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub url: String,
    pub title: String,
    pub price: String,
    pub store: String,
    pub timestamp: i64,
    #[serde(default)]
    pub loading: bool,
}
