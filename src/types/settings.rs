use serde::{Deserialize, Serialize};

/// Top-level application settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppSettings {
    pub lookup: LookupSettings,
    pub ui: UiSettings,
    pub storage: StorageSettings,
}

/// How new links get their details.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    /// Title, price and store via the paid search API.
    #[default]
    Api,
    /// User-entered price; title and store via the metadata service.
    Manual,
}

/// The payload shape a relay proxy hands back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProxyKind {
    /// `https://api.allorigins.win/get?url=`; body wrapped in a `contents` string.
    AllOrigins,
    /// `https://corsproxy.io/?`; body is the upstream body.
    Passthrough,
}

/// One cross-origin relay in the rotation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProxyConfig {
    pub name: String,
    pub kind: ProxyKind,
    /// Prefix the percent-encoded target URL is appended to.
    pub endpoint: String,
}

/// External lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LookupSettings {
    pub mode: LookupMode,
    pub search_endpoint: String,
    pub metadata_endpoint: String,
    pub proxies: Vec<ProxyConfig>,
    pub scrape_proxy: String,
    pub metadata_timeout_secs: u64,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            mode: LookupMode::Api,
            search_endpoint: "https://serpapi.com/search.json".to_string(),
            metadata_endpoint: "https://api.microlink.io/".to_string(),
            proxies: vec![
                ProxyConfig {
                    name: "AllOrigins".to_string(),
                    kind: ProxyKind::AllOrigins,
                    endpoint: "https://api.allorigins.win/get?url=".to_string(),
                },
                ProxyConfig {
                    name: "CORS.IO".to_string(),
                    kind: ProxyKind::Passthrough,
                    endpoint: "https://corsproxy.io/?".to_string(),
                },
            ],
            scrape_proxy: "https://corsproxy.io/?".to_string(),
            metadata_timeout_secs: 8,
        }
    }
}

/// Presentation settings the shell still owns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiSettings {
    pub error_dismiss_secs: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            error_dismiss_secs: 5,
        }
    }
}

/// Where the local storage database lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StorageSettings {
    /// Overrides the platform data directory when set.
    pub data_dir: Option<String>,
}
