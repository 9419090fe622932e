//! App Core for LuxeMarks.
//!
//! [`AppContext`] owns the application state, local storage, settings and
//! both lookup resolvers. Every state change goes through [`AppContext::update`];
//! no lock is held while a lookup is awaited.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::database::{Database, LocalStorage};
use crate::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait, Placeholder};
use crate::platform;
use crate::services::error_messages::{user_message, ErrorBanner};
use crate::services::http_transport::{HttpTransport, ReqwestTransport};
use crate::services::metadata_resolver::MetadataResolver;
use crate::services::price_resolver::PriceResolver;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::transfer::{self, ExportFormat};
use crate::types::bookmark::Bookmark;
use crate::types::errors::AppError;
use crate::types::settings::{AppSettings, LookupMode};

const API_PLACEHOLDER: Placeholder<'static> = Placeholder {
    title: "Fetching details from web...",
    price: "...",
    store: "Loading...",
};

/// Mutable application state.
#[derive(Debug)]
pub struct AppState {
    pub bookmarks: BookmarkManager,
    pub api_key: String,
    pub mode: LookupMode,
    pub show_key_input: bool,
    /// Lookups currently in flight.
    pub pending_lookups: usize,
    pub banner: ErrorBanner,
}

/// Serializable view of [`AppState`] at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct AppSnapshot {
    pub bookmarks: Vec<Bookmark>,
    pub has_api_key: bool,
    pub mode: LookupMode,
    pub show_key_input: bool,
    pub is_adding: bool,
    pub error: Option<String>,
}

/// Counts reported after an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

pub struct AppContext {
    state: Mutex<AppState>,
    db: Mutex<Database>,
    settings: Mutex<SettingsEngine>,
    price_resolver: PriceResolver,
    metadata_resolver: MetadataResolver,
}

/// Accepts `http(s)` URLs and bare hosts, which get an `https://` prefix.
pub fn is_valid_url(input: &str) -> bool {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };
    Url::parse(&candidate).is_ok()
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, AppError> {
    mutex.lock().map_err(|_| AppError::StatePoisoned)
}

impl AppContext {
    /// Builds the context from already-opened parts and restores stored state.
    pub fn new(
        db: Database,
        settings: SettingsEngine,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, AppError> {
        let (bookmarks, api_key) = {
            let storage = LocalStorage::new(db.connection());
            (storage.load_bookmarks()?, storage.load_api_key()?.unwrap_or_default())
        };
        let current = settings.get_settings().clone();
        info!(bookmarks = bookmarks.len(), mode = ?current.lookup.mode, "Restored application state");

        let state = AppState {
            bookmarks: BookmarkManager::from_bookmarks(bookmarks),
            show_key_input: api_key.is_empty(),
            api_key,
            mode: current.lookup.mode,
            pending_lookups: 0,
            banner: ErrorBanner::new(Duration::from_secs(current.ui.error_dismiss_secs)),
        };

        Ok(Self {
            state: Mutex::new(state),
            db: Mutex::new(db),
            settings: Mutex::new(settings),
            price_resolver: PriceResolver::new(transport.clone(), &current.lookup),
            metadata_resolver: MetadataResolver::new(transport, &current.lookup),
        })
    }

    /// Opens settings, storage and the HTTP client from their default locations.
    ///
    /// `data_dir` overrides the configured data directory.
    pub fn open(data_dir: Option<&str>) -> Result<Self, AppError> {
        let mut settings = SettingsEngine::new(None);
        if let Err(e) = settings.load() {
            warn!(error = %e, "Failed to load settings, using defaults");
        }
        let configured = data_dir
            .map(str::to_string)
            .or_else(|| settings.get_settings().storage.data_dir.clone());
        let dir = platform::resolve_data_dir(configured.as_deref());
        info!(data_dir = %dir.display(), "Opening local storage");

        let db = Database::open_in_dir(&dir)?;
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new()?);
        Self::new(db, settings, transport)
    }

    /// Runs `f` against the state under its lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> Result<R, AppError> {
        let mut state = lock(&self.state)?;
        Ok(f(&mut state))
    }

    pub fn snapshot(&self) -> Result<AppSnapshot, AppError> {
        self.update(|s| AppSnapshot {
            bookmarks: s.bookmarks.list_bookmarks().to_vec(),
            has_api_key: !s.api_key.is_empty(),
            mode: s.mode,
            show_key_input: s.show_key_input,
            is_adding: s.pending_lookups > 0,
            error: s.banner.current(Instant::now()).map(str::to_string),
        })
    }

    pub fn bookmarks(&self) -> Result<Vec<Bookmark>, AppError> {
        self.update(|s| s.bookmarks.list_bookmarks().to_vec())
    }

    pub fn api_key(&self) -> Result<String, AppError> {
        self.update(|s| s.api_key.clone())
    }

    fn persist_bookmarks(&self) -> Result<(), AppError> {
        let bookmarks = self.bookmarks()?;
        let db = lock(&self.db)?;
        LocalStorage::new(db.connection()).save_bookmarks(&bookmarks)?;
        Ok(())
    }

    /// Shows `error` on the banner and hands it back for returning.
    fn fail(&self, error: AppError) -> AppError {
        let message = error.to_string();
        if let Err(e) = self.update(|s| s.banner.show(message, Instant::now())) {
            return e;
        }
        error
    }

    /// Stores a trimmed, non-empty key. Returns whether anything was saved.
    pub fn save_api_key(&self, key: &str) -> Result<bool, AppError> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(false);
        }
        {
            let db = lock(&self.db)?;
            LocalStorage::new(db.connection()).save_api_key(key)?;
        }
        self.update(|s| {
            s.api_key = key.to_string();
            s.show_key_input = false;
            s.banner.clear();
        })?;
        info!("API key saved");
        Ok(true)
    }

    /// Forgets the stored key and reopens the key form.
    pub fn clear_api_key(&self) -> Result<(), AppError> {
        {
            let db = lock(&self.db)?;
            LocalStorage::new(db.connection()).clear_api_key()?;
        }
        self.update(|s| {
            s.api_key.clear();
            s.show_key_input = true;
        })?;
        info!("API key cleared");
        Ok(())
    }

    /// Flips manual mode; entering it closes the key form.
    pub fn toggle_manual_mode(&self) -> Result<LookupMode, AppError> {
        self.update(|s| {
            s.mode = match s.mode {
                LookupMode::Api => LookupMode::Manual,
                LookupMode::Manual => LookupMode::Api,
            };
            if s.mode == LookupMode::Manual {
                s.show_key_input = false;
            }
            s.mode
        })
    }

    /// Flips the key form; opening it leaves manual mode.
    pub fn toggle_key_input(&self) -> Result<bool, AppError> {
        self.update(|s| {
            s.show_key_input = !s.show_key_input;
            if s.show_key_input {
                s.mode = LookupMode::Api;
            }
            s.show_key_input
        })
    }

    /// Adds a link and resolves its details in the current mode.
    ///
    /// Returns `Ok(None)` for blank input. Once the placeholder is in place
    /// the bookmark always ends non-loading, even when the lookup fails.
    pub async fn add_link(&self, url: &str, manual_price: Option<&str>) -> Result<Option<Bookmark>, AppError> {
        let url = url.trim();
        if url.is_empty() {
            return Ok(None);
        }
        if !is_valid_url(url) {
            return Err(self.fail(AppError::InvalidUrl(url.to_string())));
        }

        let (mode, api_key) = self.update(|s| (s.mode, s.api_key.clone()))?;
        let id = match mode {
            LookupMode::Manual => {
                let price = manual_price.unwrap_or_default().trim();
                if price.is_empty() {
                    return Err(self.fail(AppError::MissingPrice));
                }
                self.start_lookup(url, Placeholder {
                    title: "Fetching title...",
                    price,
                    store: "Loading...",
                })?
            }
            LookupMode::Api => {
                if api_key.is_empty() {
                    self.update(|s| s.show_key_input = true)?;
                    return Err(self.fail(AppError::MissingApiKey));
                }
                self.start_lookup(url, API_PLACEHOLDER)?
            }
        };

        let finished = match mode {
            LookupMode::Manual => {
                let details = self.metadata_resolver.fetch_details(url).await;
                self.update(|s| {
                    s.bookmarks
                        .apply_details(&id, &details.title, None, &details.store)
                })
            }
            LookupMode::Api => match self.price_resolver.resolve(url, &api_key).await {
                Ok(details) => self.update(|s| {
                    s.bookmarks
                        .apply_details(&id, &details.title, Some(&details.price), &details.store)
                }),
                Err(e) => {
                    warn!(url, error = %e, "Lookup failed, keeping the link without details");
                    let guidance = user_message(&e.to_string());
                    self.update(|s| {
                        s.banner.show(guidance.message, Instant::now());
                        if guidance.show_key_input {
                            s.show_key_input = true;
                        }
                        s.bookmarks.mark_failed(&id)
                    })
                }
            },
        };

        let bookmark = self.update(|s| {
            s.pending_lookups = s.pending_lookups.saturating_sub(1);
            s.bookmarks.get_bookmark(&id).cloned()
        })?;
        // A delete during the lookup surfaces here as NotFound.
        finished??;
        self.persist_bookmarks()?;
        Ok(bookmark)
    }

    fn start_lookup(&self, url: &str, placeholder: Placeholder<'_>) -> Result<String, AppError> {
        let id = self.update(|s| {
            s.pending_lookups += 1;
            s.bookmarks.insert_placeholder(url, placeholder)
        })?;
        // The lookup still has to run so the placeholder ends non-loading.
        if let Err(e) = self.persist_bookmarks() {
            warn!(url, error = %e, "Could not save the placeholder, continuing the lookup");
        }
        Ok(id)
    }

    pub fn delete_bookmark(&self, id: &str) -> Result<Bookmark, AppError> {
        let removed = self.update(|s| s.bookmarks.remove_bookmark(id))??;
        self.persist_bookmarks()?;
        Ok(removed)
    }

    pub fn update_bookmark(&self, bookmark: Bookmark) -> Result<(), AppError> {
        self.update(|s| s.bookmarks.update_bookmark(bookmark))??;
        self.persist_bookmarks()
    }

    pub fn export(&self, format: ExportFormat) -> Result<String, AppError> {
        let bookmarks = self.bookmarks()?;
        let text = match format {
            ExportFormat::Csv => transfer::export_csv(&bookmarks)?,
            ExportFormat::Json => transfer::export_json(&bookmarks)?,
        };
        Ok(text)
    }

    /// Merges a JSON export into the collection, newest-first.
    pub fn import_json(&self, text: &str) -> Result<ImportReport, AppError> {
        let now = Utc::now().timestamp_millis();
        let report = self.update(|s| -> Result<ImportReport, AppError> {
            let mut batch = transfer::parse_import(s.bookmarks.list_bookmarks(), text, now)?;
            // No lookup runs for imported entries.
            for bookmark in &mut batch.accepted {
                bookmark.loading = false;
            }
            let imported = s.bookmarks.prepend_all(batch.accepted)?;
            Ok(ImportReport {
                imported,
                skipped: batch.skipped,
            })
        })??;
        if report.imported > 0 {
            self.persist_bookmarks()?;
        }
        info!(imported = report.imported, skipped = report.skipped, "Imported bookmarks");
        Ok(report)
    }

    pub fn settings(&self) -> Result<AppSettings, AppError> {
        Ok(lock(&self.settings)?.get_settings().clone())
    }

    /// Updates one setting. Lookup endpoints take effect on the next start.
    pub fn set_setting(&self, key: &str, value: Value) -> Result<AppSettings, AppError> {
        let mut engine = lock(&self.settings)?;
        engine.set_value(key, value)?;
        let current = engine.get_settings().clone();
        drop(engine);
        self.apply_ui_settings(&current)?;
        Ok(current)
    }

    pub fn reset_settings(&self) -> Result<AppSettings, AppError> {
        let mut engine = lock(&self.settings)?;
        engine.reset()?;
        let current = engine.get_settings().clone();
        drop(engine);
        self.apply_ui_settings(&current)?;
        Ok(current)
    }

    fn apply_ui_settings(&self, settings: &AppSettings) -> Result<(), AppError> {
        let dismiss = Duration::from_secs(settings.ui.error_dismiss_secs);
        self.update(|s| s.banner = ErrorBanner::new(dismiss))
    }
}
