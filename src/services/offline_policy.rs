//! Request classification for the offline app-shell cache.
//!
//! Lookup traffic always goes to the network, page navigations try the
//! network and fall back to the cached shell, and every other GET is served
//! from the cache first and stored after a successful fetch.
//!
//! The rules are applied by the front-end shell's request interceptor, which
//! reads them over RPC (`cache.manifest`, `cache.classify`).

use serde::Serialize;

/// Name of the current cache generation. Bump to force a refresh.
pub const CACHE_NAME: &str = "luxemarks-cache-v4";

/// Files cached when the app shell is installed.
pub const APP_SHELL_ASSETS: &[&str] = &[
    "./",
    "./index.html",
    "https://fonts.googleapis.com/icon?family=Material+Icons+Round",
    "https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700&display=swap",
];

/// Shell entry served when a navigation cannot reach the network.
pub const OFFLINE_FALLBACK: &str = "./index.html";

/// URL fragments of lookup services that must never be cached.
const NETWORK_ONLY_MARKERS: &[&str] = &[
    "serpapi.com",
    "microlink.io",
    "corsproxy.io",
    "api.allorigins.win",
    "googleapis.com/generateContent",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Always fetch; never read or write the cache.
    NetworkOnly,
    /// Fetch, falling back to [`OFFLINE_FALLBACK`] when offline.
    NetworkFirst,
    /// Serve from the cache; on a miss fetch and store a 200 response.
    CacheFirst,
}

impl CachePolicy {
    /// Whether a network response with `status` should be written to the cache.
    pub fn should_store(&self, status: u16) -> bool {
        matches!(self, CachePolicy::CacheFirst) && status == 200
    }
}

/// Policy for an outgoing request, or `None` when it is not intercepted.
pub fn classify_request(method: &str, url: &str, is_navigation: bool) -> Option<CachePolicy> {
    if !method.eq_ignore_ascii_case("GET") {
        return None;
    }
    if NETWORK_ONLY_MARKERS.iter().any(|marker| url.contains(marker)) {
        return Some(CachePolicy::NetworkOnly);
    }
    if is_navigation {
        return Some(CachePolicy::NetworkFirst);
    }
    Some(CachePolicy::CacheFirst)
}

/// Cache generations to delete on activation.
pub fn stale_caches<'a>(names: &[&'a str]) -> Vec<&'a str> {
    names
        .iter()
        .copied()
        .filter(|name| *name != CACHE_NAME)
        .collect()
}
