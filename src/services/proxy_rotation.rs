//! Cross-origin relay rotation for JSON API calls.
//!
//! Each call walks the configured relays in order. A bad status, a transport
//! failure or an unreadable payload moves on to the next relay. A payload that
//! decodes but carries an `error` field came from the lookup service itself,
//! so it ends the rotation and its message is returned verbatim.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::services::http_transport::{encode_component, HttpTransport};
use crate::types::errors::LookupError;
use crate::types::settings::{ProxyConfig, ProxyKind};

pub struct ProxyRotator {
    transport: Arc<dyn HttpTransport>,
    proxies: Vec<ProxyConfig>,
}

impl ProxyRotator {
    pub fn new(transport: Arc<dyn HttpTransport>, proxies: Vec<ProxyConfig>) -> Self {
        Self { transport, proxies }
    }

    /// Relay URL carrying `target` as its percent-encoded query.
    pub fn relay_url(proxy: &ProxyConfig, target: &str) -> String {
        format!("{}{}", proxy.endpoint, encode_component(target))
    }

    /// Fetches `target` through the relays and returns its decoded JSON body.
    pub async fn fetch_json(&self, target: &str) -> Result<Value, LookupError> {
        let mut last_error: Option<LookupError> = None;

        for proxy in &self.proxies {
            match self.fetch_via(proxy, target).await {
                Ok(data) => {
                    if let Some(message) = upstream_error(&data) {
                        warn!(proxy = %proxy.name, error = %message, "Lookup service returned an error");
                        return Err(LookupError::Upstream(message));
                    }
                    debug!(proxy = %proxy.name, "Proxy fetch succeeded");
                    return Ok(data);
                }
                Err(e) => {
                    warn!(proxy = %proxy.name, error = %e, "Proxy failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(LookupError::AllProxiesFailed(e.to_string())),
            None => Err(LookupError::NoProxies),
        }
    }

    async fn fetch_via(&self, proxy: &ProxyConfig, target: &str) -> Result<Value, LookupError> {
        let response = self.transport.get(&Self::relay_url(proxy, target)).await?;
        if !response.is_success() {
            return Err(LookupError::ProxyStatus {
                proxy: proxy.name.clone(),
                status: response.status,
            });
        }

        let payload: Value = serde_json::from_str(&response.body)
            .map_err(|e| LookupError::InvalidResponse(e.to_string()))?;

        match proxy.kind {
            ProxyKind::Passthrough => Ok(payload),
            ProxyKind::AllOrigins => {
                let contents = payload
                    .get("contents")
                    .and_then(Value::as_str)
                    .filter(|c| !c.is_empty())
                    .ok_or_else(|| {
                        LookupError::InvalidResponse("Invalid AllOrigins response format".to_string())
                    })?;
                serde_json::from_str(contents).map_err(|e| LookupError::InvalidResponse(e.to_string()))
            }
        }
    }
}

/// The service-level error message embedded in a payload, if any.
///
/// Falsy values (`null`, `false`, `0`, `""`) mean no error.
fn upstream_error(data: &Value) -> Option<String> {
    match data.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(message) if message.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}
