// LuxeMarks services
// Lookup pipeline (transport, proxy rotation, extraction, resolvers), import/export,
// offline cache policy, error guidance and settings.

pub mod error_messages;
pub mod http_transport;
pub mod metadata_resolver;
pub mod offline_policy;
pub mod price_extraction;
pub mod price_resolver;
pub mod proxy_rotation;
pub mod region;
pub mod settings_engine;
pub mod transfer;
