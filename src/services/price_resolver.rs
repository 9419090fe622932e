//! Product detail resolver.
//!
//! Resolves `{title, price, store}` for a product URL through an ordered list
//! of tiers:
//!
//! 1. **Marketplace direct**: structured product lookup when the URL is an
//!    Amazon link with an extractable ASIN.
//! 2. **Generic search**: web search for the literal URL; provides the title
//!    and possibly the price.
//! 3. **Shopping search**: price-only refinement using the cleaned title.
//! 4. **Raw scrape**: price-only refinement from the page's own HTML.
//!
//! Each tier reports a [`TierOutcome`]; [`reduce`] decides whether to finish,
//! continue or abort. Tiers 3 and 4 only refine a title found by tier 2: when
//! tier 2 fails outright the whole resolution fails.

use std::sync::Arc;

use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::services::http_transport::{encode_component, HttpTransport};
use crate::services::price_extraction::{
    clean_result_title, clean_shopping_query, extract_search_price, scrape_html_price,
    value_text, OrganicResult,
};
use crate::services::proxy_rotation::ProxyRotator;
use crate::services::region::{detect_marketplace, detect_region, extract_asin, store_label};
use crate::types::bookmark::PRICE_PLACEHOLDER;
use crate::types::errors::LookupError;
use crate::types::product::{Marketplace, ProductDetails, RegionProfile};
use crate::types::settings::LookupSettings;

/// Resolution tiers in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    MarketplaceDirect,
    GenericSearch,
    ShoppingSearch,
    RawScrape,
}

pub const TIER_ORDER: [Tier; 4] = [
    Tier::MarketplaceDirect,
    Tier::GenericSearch,
    Tier::ShoppingSearch,
    Tier::RawScrape,
];

/// What a single tier produced.
#[derive(Debug, Clone, PartialEq)]
pub enum TierOutcome {
    /// Details with a usable price.
    Priced(ProductDetails),
    /// Details whose price is missing or the placeholder.
    Unpriced(ProductDetails),
    Failed(LookupError),
    /// The tier does not apply to this URL or state; no request was made.
    Skipped,
}

/// The next step after a tier.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Finish(ProductDetails),
    /// Run the next tier, carrying the best title-bearing result so far.
    Continue(Option<ProductDetails>),
    Abort(LookupError),
}

/// Chooses the next step from a tier's outcome and the best result so far.
pub fn reduce(tier: Tier, outcome: TierOutcome, best: Option<ProductDetails>) -> Decision {
    if let TierOutcome::Priced(details) = outcome {
        return Decision::Finish(details);
    }

    match tier {
        Tier::MarketplaceDirect | Tier::ShoppingSearch => Decision::Continue(best),
        Tier::GenericSearch => match outcome {
            TierOutcome::Unpriced(details) => Decision::Continue(Some(details)),
            TierOutcome::Failed(e) => Decision::Abort(LookupError::Exhausted(e.to_string())),
            _ => Decision::Abort(LookupError::Exhausted(
                "No search results found".to_string(),
            )),
        },
        Tier::RawScrape => match best {
            Some(details) => Decision::Finish(details),
            None => Decision::Abort(LookupError::Exhausted(
                "No search results found".to_string(),
            )),
        },
    }
}

fn classify(details: ProductDetails) -> TierOutcome {
    if details.is_priced() {
        TierOutcome::Priced(details)
    } else {
        TierOutcome::Unpriced(details)
    }
}

/// Per-call inputs shared by every tier.
struct LookupContext<'a> {
    url: &'a str,
    api_key: &'a str,
    region: RegionProfile,
    marketplace: Option<Marketplace>,
}

#[derive(Deserialize)]
struct MarketplaceResponse {
    product_result: Option<MarketplaceProduct>,
}

#[derive(Deserialize)]
struct MarketplaceProduct {
    title: Option<String>,
    price: Option<Value>,
    buybox_winner: Option<PricedEntry>,
    price_string: Option<Value>,
    options: Option<Vec<PricedEntry>>,
    used_price: Option<Value>,
}

impl MarketplaceProduct {
    /// First usable price across the fields the product lookup may fill.
    fn best_price(&self) -> Option<String> {
        let first_option = self.options.as_ref().and_then(|o| o.first());
        [
            self.price.as_ref(),
            self.buybox_winner.as_ref().and_then(|b| b.price.as_ref()),
            self.price_string.as_ref(),
            first_option.and_then(|o| o.price.as_ref()),
            self.used_price.as_ref(),
        ]
        .into_iter()
        .flatten()
        .find_map(value_text)
    }
}

#[derive(Deserialize)]
struct PricedEntry {
    price: Option<Value>,
}

#[derive(Deserialize)]
struct SearchResponse {
    organic_results: Option<Vec<OrganicResult>>,
}

#[derive(Deserialize)]
struct ShoppingResponse {
    shopping_results: Option<Vec<PricedEntry>>,
}

/// Resolves product details through the tier cascade.
pub struct PriceResolver {
    transport: Arc<dyn HttpTransport>,
    rotator: ProxyRotator,
    search_endpoint: String,
    scrape_proxy: String,
}

impl PriceResolver {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: &LookupSettings) -> Self {
        Self {
            rotator: ProxyRotator::new(transport.clone(), settings.proxies.clone()),
            transport,
            search_endpoint: settings.search_endpoint.clone(),
            scrape_proxy: settings.scrape_proxy.clone(),
        }
    }

    /// Resolves `url` to product details, degrading through the tiers.
    ///
    /// Fails only when the generic search tier fails; the error then carries
    /// that tier's cause.
    pub async fn resolve(&self, url: &str, api_key: &str) -> Result<ProductDetails, LookupError> {
        let ctx = LookupContext {
            url,
            api_key,
            region: detect_region(url),
            marketplace: detect_marketplace(url),
        };

        let mut best: Option<ProductDetails> = None;
        for tier in TIER_ORDER {
            let outcome = self.run_tier(tier, &ctx, best.as_ref()).await;
            debug!(?tier, ?outcome, "Tier finished");
            match reduce(tier, outcome, best) {
                Decision::Finish(details) => {
                    info!(?tier, url, price = %details.price, "Resolved product details");
                    return Ok(details);
                }
                Decision::Continue(next) => best = next,
                Decision::Abort(e) => {
                    warn!(?tier, url, error = %e, "Product lookup failed");
                    return Err(e);
                }
            }
        }

        Err(LookupError::Exhausted("No tier produced details".to_string()))
    }

    async fn run_tier(
        &self,
        tier: Tier,
        ctx: &LookupContext<'_>,
        best: Option<&ProductDetails>,
    ) -> TierOutcome {
        match tier {
            Tier::MarketplaceDirect => {
                if ctx.marketplace != Some(Marketplace::Amazon) {
                    return TierOutcome::Skipped;
                }
                let Some(asin) = extract_asin(ctx.url) else {
                    return TierOutcome::Skipped;
                };
                match self.fetch_marketplace_details(&asin, ctx).await {
                    Ok(details) => classify(details),
                    Err(e) => {
                        warn!(asin = %asin, error = %e, "Marketplace direct lookup failed, falling back to search");
                        TierOutcome::Failed(e)
                    }
                }
            }
            Tier::GenericSearch => match self.fetch_search_details(ctx).await {
                Ok(details) => classify(details),
                Err(e) => {
                    warn!(error = %e, "URL search failed");
                    TierOutcome::Failed(e)
                }
            },
            Tier::ShoppingSearch => {
                let Some(best) = best.filter(|b| !b.title.trim().is_empty()) else {
                    return TierOutcome::Skipped;
                };
                match self.fetch_shopping_price(&best.title, ctx).await {
                    Ok(Some(price)) => TierOutcome::Priced(ProductDetails {
                        price,
                        ..best.clone()
                    }),
                    Ok(None) => TierOutcome::Unpriced(best.clone()),
                    Err(e) => {
                        warn!(error = %e, "Shopping search fallback failed");
                        TierOutcome::Failed(e)
                    }
                }
            }
            Tier::RawScrape => {
                let Some(best) = best else {
                    return TierOutcome::Skipped;
                };
                match self.scrape_price(ctx.url).await {
                    Some(price) => TierOutcome::Priced(ProductDetails {
                        price,
                        ..best.clone()
                    }),
                    None => TierOutcome::Unpriced(best.clone()),
                }
            }
        }
    }

    fn search_url(&self, params: &[(&str, &str)], api_key: &str) -> Result<String, LookupError> {
        let mut query: Vec<(&str, &str)> = params.to_vec();
        query.push(("api_key", api_key));
        Url::parse_with_params(&self.search_endpoint, &query)
            .map(|u| u.to_string())
            .map_err(|e| LookupError::Transport(format!("Invalid search endpoint: {}", e)))
    }

    async fn fetch_marketplace_details(
        &self,
        asin: &str,
        ctx: &LookupContext<'_>,
    ) -> Result<ProductDetails, LookupError> {
        let target = self.search_url(
            &[
                ("engine", "amazon_product"),
                ("product_id", asin),
                ("domain", ctx.region.amazon_domain),
            ],
            ctx.api_key,
        )?;
        let data = self.rotator.fetch_json(&target).await?;
        let response: MarketplaceResponse = serde_json::from_value(data)
            .map_err(|e| LookupError::InvalidResponse(e.to_string()))?;
        let product = response
            .product_result
            .ok_or_else(|| LookupError::NoResults("No product result found".to_string()))?;

        Ok(ProductDetails {
            price: product
                .best_price()
                .unwrap_or_else(|| PRICE_PLACEHOLDER.to_string()),
            title: product
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Amazon Product".to_string()),
            store: Marketplace::Amazon.label().to_string(),
        })
    }

    async fn fetch_search_details(&self, ctx: &LookupContext<'_>) -> Result<ProductDetails, LookupError> {
        let target = self.search_url(
            &[
                ("engine", "google"),
                ("q", ctx.url),
                ("gl", ctx.region.gl),
                ("google_domain", ctx.region.google_domain),
            ],
            ctx.api_key,
        )?;
        let data = self.rotator.fetch_json(&target).await?;
        let response: SearchResponse = serde_json::from_value(data)
            .map_err(|e| LookupError::InvalidResponse(e.to_string()))?;
        let first = response
            .organic_results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| LookupError::NoResults("No search results found".to_string()))?;

        let raw_title = first
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Unknown Product");

        Ok(ProductDetails {
            title: clean_result_title(raw_title),
            price: extract_search_price(&first).unwrap_or_else(|| PRICE_PLACEHOLDER.to_string()),
            store: store_label(ctx.url).to_string(),
        })
    }

    async fn fetch_shopping_price(
        &self,
        title: &str,
        ctx: &LookupContext<'_>,
    ) -> Result<Option<String>, LookupError> {
        let query = clean_shopping_query(title);
        let target = self.search_url(
            &[
                ("engine", "google_shopping"),
                ("q", query.as_str()),
                ("gl", ctx.region.gl),
                ("google_domain", ctx.region.google_domain),
            ],
            ctx.api_key,
        )?;
        let data = self.rotator.fetch_json(&target).await?;
        let response: ShoppingResponse = serde_json::from_value(data)
            .map_err(|e| LookupError::InvalidResponse(e.to_string()))?;

        Ok(response
            .shopping_results
            .and_then(|results| results.into_iter().next())
            .and_then(|first| first.price)
            .and_then(|price| value_text(&price)))
    }

    /// Last-resort price from the page HTML. Any failure yields `None`.
    async fn scrape_price(&self, url: &str) -> Option<String> {
        let relay = format!("{}{}", self.scrape_proxy, encode_component(url));
        match self.transport.get(&relay).await {
            Ok(response) if response.is_success() => scrape_html_price(&response.body, url),
            Ok(response) => {
                debug!(status = response.status, "Scrape proxy returned non-success status");
                None
            }
            Err(e) => {
                debug!(error = %e, "Scrape proxy request failed");
                None
            }
        }
    }
}
