//! LuxeMarks database layer.
//!
//! Provides SQLite connection management, schema migrations and the
//! key/value local storage that holds the bookmark list and API key.
//!
//! # Usage
//!
//! ```no_run
//! use luxemarks::database::{Database, LocalStorage};
//!
//! let db = Database::open("luxemarks.db").expect("failed to open database");
//! let storage = LocalStorage::new(db.connection());
//! storage.set_item("serp_api_key", "abc123").expect("write failed");
//! ```

pub mod connection;
pub mod local_storage;
pub mod migrations;

pub use connection::Database;
pub use local_storage::LocalStorage;
