use std::fmt;

// === LookupError ===

/// Errors raised while resolving product details over the network.
///
/// The display strings are matched by substring when choosing the guidance
/// message shown to the user, so they must stay stable.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupError {
    /// The HTTP request could not be sent or its body could not be read.
    Transport(String),
    /// A relay proxy answered with a non-success status.
    ProxyStatus { proxy: String, status: u16 },
    /// The response body was not in the expected shape.
    InvalidResponse(String),
    /// The lookup service returned an error payload (e.g. a bad API key).
    Upstream(String),
    /// Every relay proxy failed; carries the last error seen.
    AllProxiesFailed(String),
    /// No relay proxy is configured.
    NoProxies,
    /// The search returned no usable result.
    NoResults(String),
    /// The request did not complete within its deadline.
    Timeout(u64),
    /// No tier could produce product details; carries the cause.
    Exhausted(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::Transport(msg) => write!(f, "Transport error: {}", msg),
            LookupError::ProxyStatus { proxy, status } => {
                write!(f, "Proxy '{}' returned status {}", proxy, status)
            }
            LookupError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            LookupError::Upstream(msg) => write!(f, "{}", msg),
            LookupError::AllProxiesFailed(last) => {
                write!(f, "All API proxies failed. Last error: {}", last)
            }
            LookupError::NoProxies => {
                write!(f, "Failed to fetch from API after trying all proxies.")
            }
            LookupError::NoResults(msg) => write!(f, "{}", msg),
            LookupError::Timeout(secs) => write!(f, "Request timed out after {}s", secs),
            LookupError::Exhausted(cause) => write!(
                f,
                "Could not fetch product details. Please check the URL. ({})",
                cause
            ),
        }
    }
}

impl std::error::Error for LookupError {}

// === BookmarkError ===

/// Errors related to bookmark collection operations.
#[derive(Debug, PartialEq)]
pub enum BookmarkError {
    /// Bookmark with the given ID was not found.
    NotFound(String),
    /// A bookmark with the same ID already exists.
    DuplicateId(String),
}

impl fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkError::NotFound(id) => write!(f, "Bookmark not found: {}", id),
            BookmarkError::DuplicateId(id) => write!(f, "Duplicate bookmark ID: {}", id),
        }
    }
}

impl std::error::Error for BookmarkError {}

// === StorageError ===

/// Errors from the local key/value storage.
#[derive(Debug)]
pub enum StorageError {
    /// Database operation failed.
    DatabaseError(String),
    /// A stored value could not be encoded or decoded.
    SerializationError(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DatabaseError(msg) => write!(f, "Storage database error: {}", msg),
            StorageError::SerializationError(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::DatabaseError(e.to_string())
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

// === TransferError ===

/// Errors related to bookmark import and export.
#[derive(Debug)]
pub enum TransferError {
    /// The import payload is not valid JSON.
    InvalidJson(String),
    /// The import payload is valid JSON but not an array.
    NotAnArray,
    /// Writing the export failed.
    ExportFailed(String),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::InvalidJson(msg) => write!(f, "Invalid import file: {}", msg),
            TransferError::NotAnArray => {
                write!(f, "Invalid import file: expected a JSON array of bookmarks")
            }
            TransferError::ExportFailed(msg) => write!(f, "Export failed: {}", msg),
        }
    }
}

impl std::error::Error for TransferError {}

// === AppError ===

/// Errors surfaced by the application context.
#[derive(Debug)]
pub enum AppError {
    /// The entered URL cannot be parsed.
    InvalidUrl(String),
    /// Manual mode was used without a price.
    MissingPrice,
    /// API mode was used without a stored API key.
    MissingApiKey,
    /// The application state lock was poisoned.
    StatePoisoned,
    Lookup(LookupError),
    Bookmark(BookmarkError),
    Storage(StorageError),
    Settings(SettingsError),
    Transfer(TransferError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidUrl(_) => write!(f, "Please enter a valid URL"),
            AppError::MissingPrice => write!(f, "Please enter a price for the bookmark."),
            AppError::MissingApiKey => write!(f, "Please enter your SerpApi Key first"),
            AppError::StatePoisoned => write!(f, "Application state lock poisoned"),
            AppError::Lookup(e) => write!(f, "{}", e),
            AppError::Bookmark(e) => write!(f, "{}", e),
            AppError::Storage(e) => write!(f, "{}", e),
            AppError::Settings(e) => write!(f, "{}", e),
            AppError::Transfer(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AppError {}

impl From<LookupError> for AppError {
    fn from(e: LookupError) -> Self {
        AppError::Lookup(e)
    }
}

impl From<BookmarkError> for AppError {
    fn from(e: BookmarkError) -> Self {
        AppError::Bookmark(e)
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Storage(e)
    }
}

impl From<SettingsError> for AppError {
    fn from(e: SettingsError) -> Self {
        AppError::Settings(e)
    }
}

impl From<TransferError> for AppError {
    fn from(e: TransferError) -> Self {
        AppError::Transfer(e)
    }
}
