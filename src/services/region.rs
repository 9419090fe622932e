//! Marketplace and region detection from product URLs.
//!
//! Detection is purely syntactic: lowercase substring checks on the URL.

use std::sync::OnceLock;

use regex::Regex;
use reqwest::Url;

use crate::types::product::{Marketplace, RegionProfile};

/// Store label used when no known marketplace matches.
pub const GENERIC_STORE: &str = "Web Store";

/// Detects which known marketplace a URL belongs to.
pub fn detect_marketplace(url: &str) -> Option<Marketplace> {
    let lower = url.to_lowercase();
    if lower.contains("amazon") || lower.contains("amzn") {
        Some(Marketplace::Amazon)
    } else if lower.contains("flipkart") {
        Some(Marketplace::Flipkart)
    } else if lower.contains("myntra") {
        Some(Marketplace::Myntra)
    } else if lower.contains("ajio") {
        Some(Marketplace::Ajio)
    } else if lower.contains("jiomart") {
        Some(Marketplace::JioMart)
    } else {
        None
    }
}

/// Store label for a URL: the marketplace name or `Web Store`.
pub fn store_label(url: &str) -> &'static str {
    detect_marketplace(url)
        .map(|m| m.label())
        .unwrap_or(GENERIC_STORE)
}

/// Picks the region profile used to localize search requests.
pub fn detect_region(url: &str) -> RegionProfile {
    let lower = url.to_lowercase();
    if lower.contains(".in/")
        || lower.ends_with(".in")
        || lower.contains("flipkart")
        || lower.contains("myntra")
    {
        RegionProfile::INDIA
    } else if lower.contains(".co.uk") {
        RegionProfile::UK
    } else {
        RegionProfile::US
    }
}

fn asin_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Literal pattern; cannot fail to compile.
    RE.get_or_init(|| {
        Regex::new(r"/(?:dp|gp/product)/([A-Z0-9]{10})").expect("static ASIN regex")
    })
}

/// Extracts the Amazon product identifier from a URL path (`/dp/<ID>`,
/// `/gp/product/<ID>`) or, failing that, the `pd_rd_i` query parameter.
pub fn extract_asin(url: &str) -> Option<String> {
    if let Some(caps) = asin_path_regex().captures(url) {
        return Some(caps[1].to_string());
    }
    let parsed = Url::parse(url).ok()?;
    let found = parsed
        .query_pairs()
        .find(|(name, value)| name == "pd_rd_i" && !value.is_empty())
        .map(|(_, value)| value.into_owned());
    found
}
