//! Title cleanup and price extraction from search results and raw HTML.
//!
//! Everything here is pure string work; the resolvers do the fetching.

use std::sync::OnceLock;

use regex::Regex;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Map, Value};

/// First organic result of a web search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganicResult {
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub rich_snippet: Option<RichSnippet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RichSnippet {
    pub top: Option<RichSnippetSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RichSnippetSection {
    pub detected_extensions: Option<Map<String, Value>>,
    pub attributes: Option<Map<String, Value>>,
}

// Patterns are string literals covered by tests, so compilation cannot fail.
macro_rules! static_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("static regex"))
        }
    };
}

static_regex!(
    currency_amount_re,
    r"(?i)(?:₹|Rs\.?|INR|\$|€|£|GBP|USD)\s?[\d,]+(?:\.\d{2})?"
);
static_regex!(price_label_re, r"(?i)Price:\s*([^.]*)");
static_regex!(labelled_amount_re, r"(?i)(?:₹|Rs\.?|INR|\$)\s?[\d,]+");
static_regex!(
    meta_price_re,
    r#"(?i)<meta[^>]+(?:property|name)=["'](?:og:price:amount|product:price:amount|twitter:data1)["'][^>]+content=["']([^"']+)["']"#
);
static_regex!(
    json_price_re,
    r#"(?i)"price"\s*:\s*["']?(\d+(?:,\d+)*(?:\.\d+)?)["']?"#
);
static_regex!(
    og_title_re,
    r#"(?i)<meta\s+property=["']og:title["']\s+content=["']([^"']+)["']"#
);
static_regex!(title_tag_re, r"(?i)<title>([^<]+)</title>");
static_regex!(
    og_site_name_re,
    r#"(?i)<meta\s+property=["']og:site_name["']\s+content=["']([^"']+)["']"#
);
static_regex!(plain_number_re, r"^[\d,.]+$");

/// Keeps the part of a page/result title before the first `|`, or failing
/// that before the first ` - `.
pub fn clean_result_title(title: &str) -> String {
    let head = if let Some((head, _)) = title.split_once('|') {
        head
    } else if let Some((head, _)) = title.split_once(" - ") {
        head
    } else {
        title
    };
    head.trim().to_string()
}

/// Reduces a result title to a shopping-search query: text before the first
/// `|` and then the first `-`, without a trailing ellipsis.
pub fn clean_shopping_query(title: &str) -> String {
    let head = title.split('|').next().unwrap_or_default();
    let head = head.split('-').next().unwrap_or_default().trim();
    head.strip_suffix("...").unwrap_or(head).trim().to_string()
}

/// Renders a JSON string or number the way it would print in a page.
pub fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn mentions_currency(text: &str) -> bool {
    text.contains('₹') || text.contains('$')
}

/// Probes an organic search result for a price.
///
/// Order: rich-snippet extensions keyed by price or currency, rich-snippet
/// attribute values with a currency symbol, a currency amount in the snippet,
/// then an amount inside a `Price: ...` label. The first hit wins.
pub fn extract_search_price(result: &OrganicResult) -> Option<String> {
    let top = result.rich_snippet.as_ref().and_then(|r| r.top.as_ref());

    if let Some(extensions) = top.and_then(|t| t.detected_extensions.as_ref()) {
        let price = extensions
            .iter()
            .find(|(key, _)| key.to_lowercase().contains("price") || mentions_currency(key))
            .and_then(|(_, value)| value_text(value));
        if price.is_some() {
            return price;
        }
    }

    if let Some(attributes) = top.and_then(|t| t.attributes.as_ref()) {
        let price = attributes
            .values()
            .filter_map(value_text)
            .find(|text| mentions_currency(text));
        if price.is_some() {
            return price;
        }
    }

    let snippet = result.snippet.as_deref()?;
    snippet_price(snippet)
}

/// Currency amount inside snippet text, or inside its `Price: ...` label.
pub fn snippet_price(snippet: &str) -> Option<String> {
    if let Some(m) = currency_amount_re().find(snippet) {
        return Some(m.as_str().to_string());
    }
    let labelled = price_label_re().captures(snippet)?.get(1)?.as_str();
    labelled_amount_re()
        .find(labelled)
        .map(|m| m.as_str().to_string())
}

/// True for URLs whose prices are quoted in rupees.
pub fn is_indian_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    let indian_host = Url::parse(&lower)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.ends_with(".in")))
        .unwrap_or(false);
    indian_host
        || lower.contains(".in/")
        || lower.contains("flipkart")
        || lower.contains("myntra")
        || lower.contains("ajio")
}

/// Prefixes a bare number with the currency symbol implied by the URL.
pub fn format_price(raw: &str, url: &str) -> String {
    let cleaned = raw.trim();
    if !plain_number_re().is_match(cleaned) {
        return cleaned.to_string();
    }
    if is_indian_url(url) {
        format!("₹{}", cleaned)
    } else {
        format!("${}", cleaned)
    }
}

/// Finds a price in raw product-page HTML via meta tags or a JSON fragment.
pub fn scrape_html_price(html: &str, url: &str) -> Option<String> {
    let raw = meta_price_re()
        .captures(html)
        .or_else(|| json_price_re().captures(html))?
        .get(1)?
        .as_str()
        .to_string();
    Some(format_price(&raw, url))
}

/// Page title from `og:title`, else the `<title>` tag.
pub fn extract_page_title(html: &str) -> Option<String> {
    og_title_re()
        .captures(html)
        .or_else(|| title_tag_re().captures(html))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Site name from `og:site_name`.
pub fn extract_site_name(html: &str) -> Option<String> {
    og_site_name_re()
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
