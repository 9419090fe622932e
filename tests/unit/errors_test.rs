use luxemarks::types::errors::*;

// === LookupError Tests ===

#[test]
fn lookup_error_upstream_is_verbatim() {
    let err = LookupError::Upstream("Invalid API key. Your API key should be here".to_string());
    assert_eq!(err.to_string(), "Invalid API key. Your API key should be here");
}

#[test]
fn lookup_error_all_proxies_failed_display() {
    let err = LookupError::AllProxiesFailed("Proxy 'CORS.IO' returned status 500".to_string());
    assert_eq!(
        err.to_string(),
        "All API proxies failed. Last error: Proxy 'CORS.IO' returned status 500"
    );
}

#[test]
fn lookup_error_display_variants() {
    assert_eq!(
        LookupError::ProxyStatus { proxy: "AllOrigins".to_string(), status: 429 }.to_string(),
        "Proxy 'AllOrigins' returned status 429"
    );
    assert_eq!(
        LookupError::NoProxies.to_string(),
        "Failed to fetch from API after trying all proxies."
    );
    assert_eq!(LookupError::Timeout(8).to_string(), "Request timed out after 8s");
    assert_eq!(
        LookupError::Exhausted("No search results found".to_string()).to_string(),
        "Could not fetch product details. Please check the URL. (No search results found)"
    );
}

#[test]
fn lookup_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(LookupError::NoProxies);
    assert!(err.source().is_none());
}

// === BookmarkError Tests ===

#[test]
fn bookmark_error_display_variants() {
    assert_eq!(
        BookmarkError::NotFound("bm-1".to_string()).to_string(),
        "Bookmark not found: bm-1"
    );
    assert_eq!(
        BookmarkError::DuplicateId("bm-2".to_string()).to_string(),
        "Duplicate bookmark ID: bm-2"
    );
}

// === StorageError Tests ===

#[test]
fn storage_error_display_variants() {
    assert_eq!(
        StorageError::DatabaseError("disk full".to_string()).to_string(),
        "Storage database error: disk full"
    );
    assert_eq!(
        StorageError::SerializationError("bad json".to_string()).to_string(),
        "Storage serialization error: bad json"
    );
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::InvalidKey("lookup.nope".to_string()).to_string(),
        "Invalid settings key: lookup.nope"
    );
    assert_eq!(
        SettingsError::IoError("denied".to_string()).to_string(),
        "Settings I/O error: denied"
    );
}

// === TransferError Tests ===

#[test]
fn transfer_error_display_variants() {
    assert_eq!(
        TransferError::NotAnArray.to_string(),
        "Invalid import file: expected a JSON array of bookmarks"
    );
    assert_eq!(
        TransferError::ExportFailed("io".to_string()).to_string(),
        "Export failed: io"
    );
}

// === AppError Tests ===

#[test]
fn app_error_user_messages() {
    assert_eq!(
        AppError::InvalidUrl("not a url".to_string()).to_string(),
        "Please enter a valid URL"
    );
    assert_eq!(AppError::MissingPrice.to_string(), "Please enter a price for the bookmark.");
    assert_eq!(AppError::MissingApiKey.to_string(), "Please enter your SerpApi Key first");
}

#[test]
fn app_error_wraps_inner_errors() {
    let err: AppError = BookmarkError::NotFound("x".to_string()).into();
    assert_eq!(err.to_string(), "Bookmark not found: x");

    let err: AppError = LookupError::NoProxies.into();
    assert!(matches!(err, AppError::Lookup(LookupError::NoProxies)));
}
