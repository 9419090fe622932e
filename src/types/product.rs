use serde::{Deserialize, Serialize};

use super::bookmark::PRICE_PLACEHOLDER;

/// Result of a full price lookup for a product URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub title: String,
    pub price: String,
    pub store: String,
}

impl ProductDetails {
    /// True when `price` holds a real value rather than the placeholder.
    pub fn is_priced(&self) -> bool {
        !self.price.trim().is_empty() && self.price != PRICE_PLACEHOLDER
    }
}

/// Result of the metadata-only lookup used in manual mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDetails {
    pub title: String,
    pub store: String,
}

/// Localization triple used for outgoing search requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionProfile {
    /// Search-engine country code (`gl` parameter).
    pub gl: &'static str,
    pub google_domain: &'static str,
    pub amazon_domain: &'static str,
}

impl RegionProfile {
    pub const INDIA: RegionProfile = RegionProfile {
        gl: "in",
        google_domain: "google.co.in",
        amazon_domain: "amazon.in",
    };

    pub const UK: RegionProfile = RegionProfile {
        gl: "uk",
        google_domain: "google.co.uk",
        amazon_domain: "amazon.co.uk",
    };

    pub const US: RegionProfile = RegionProfile {
        gl: "us",
        google_domain: "google.com",
        amazon_domain: "amazon.com",
    };
}

/// Known marketplaces, detected from URL substrings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marketplace {
    Amazon,
    Flipkart,
    Myntra,
    Ajio,
    JioMart,
}

impl Marketplace {
    /// Display label stored on bookmarks.
    pub fn label(&self) -> &'static str {
        match self {
            Marketplace::Amazon => "Amazon",
            Marketplace::Flipkart => "Flipkart",
            Marketplace::Myntra => "Myntra",
            Marketplace::Ajio => "Ajio",
            Marketplace::JioMart => "JioMart",
        }
    }
}
