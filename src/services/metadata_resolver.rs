//! Metadata-only resolver used in manual mode.
//!
//! Asks the metadata extraction service for the page title and publisher.
//! When that fails it scrapes the page through the relay proxy, and when that
//! fails too it falls back to the raw URL. It never returns an error.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::services::http_transport::{encode_component, HttpTransport};
use crate::services::price_extraction::{clean_result_title, extract_page_title, extract_site_name};
use crate::services::region::store_label;
use crate::types::errors::LookupError;
use crate::types::product::MetadataDetails;
use crate::types::settings::LookupSettings;

#[derive(Deserialize)]
struct MetadataResponse {
    status: Option<String>,
    data: Option<MetadataPayload>,
}

#[derive(Deserialize)]
struct MetadataPayload {
    title: Option<String>,
    publisher: Option<String>,
}

pub struct MetadataResolver {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
    scrape_proxy: String,
    timeout: Duration,
}

impl MetadataResolver {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: &LookupSettings) -> Self {
        Self {
            transport,
            endpoint: settings.metadata_endpoint.clone(),
            scrape_proxy: settings.scrape_proxy.clone(),
            timeout: Duration::from_secs(settings.metadata_timeout_secs),
        }
    }

    /// Title and store for `url`, best effort.
    pub async fn fetch_details(&self, url: &str) -> MetadataDetails {
        match self.fetch_from_service(url).await {
            Ok(details) => details,
            Err(e) => {
                warn!(url, error = %e, "Metadata service failed, falling back to direct scraping");
                match self.scrape(url).await {
                    Ok(details) => details,
                    Err(e) => {
                        warn!(url, error = %e, "Direct scraping also failed");
                        MetadataDetails {
                            title: url.to_string(),
                            store: store_label(url).to_string(),
                        }
                    }
                }
            }
        }
    }

    async fn fetch_from_service(&self, url: &str) -> Result<MetadataDetails, LookupError> {
        let api_url = Url::parse_with_params(&self.endpoint, &[("url", url)])
            .map_err(|e| LookupError::Transport(format!("Invalid metadata endpoint: {}", e)))?;

        let response = timeout(self.timeout, self.transport.get(api_url.as_str()))
            .await
            .map_err(|_| LookupError::Timeout(self.timeout.as_secs()))??;

        if !response.is_success() {
            return Err(LookupError::InvalidResponse(format!(
                "Metadata service returned status {}",
                response.status
            )));
        }

        let parsed: MetadataResponse = serde_json::from_str(&response.body)
            .map_err(|e| LookupError::InvalidResponse(e.to_string()))?;

        match (parsed.status.as_deref(), parsed.data) {
            (Some("success"), Some(data)) => Ok(MetadataDetails {
                title: data
                    .title
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| "Unknown Product".to_string()),
                store: data
                    .publisher
                    .filter(|p| !p.trim().is_empty())
                    .unwrap_or_else(|| store_label(url).to_string()),
            }),
            _ => Err(LookupError::InvalidResponse(
                "Metadata service could not process the URL.".to_string(),
            )),
        }
    }

    async fn scrape(&self, url: &str) -> Result<MetadataDetails, LookupError> {
        let relay = format!("{}{}", self.scrape_proxy, encode_component(url));
        let response = self.transport.get(&relay).await?;
        if !response.is_success() {
            return Err(LookupError::InvalidResponse(format!(
                "Proxy fetch failed with status {}",
                response.status
            )));
        }

        let title = extract_page_title(&response.body).unwrap_or_else(|| "Bookmark".to_string());
        let store = extract_site_name(&response.body).unwrap_or_else(|| store_label(url).to_string());
        debug!(url, title = %title, store = %store, "Scraped page metadata");

        Ok(MetadataDetails {
            title: clean_result_title(&title),
            store,
        })
    }
}
