//! Key/value local storage for LuxeMarks.
//!
//! Mirrors the browser `localStorage` contract on top of SQLite: string keys,
//! string values, last write wins. The bookmark list is stored as one JSON
//! array under [`BOOKMARKS_KEY`] and the API credential under [`API_KEY_KEY`].

use rusqlite::{params, Connection, OptionalExtension};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::types::bookmark::Bookmark;
use crate::types::errors::StorageError;

/// Storage key holding the serialized bookmark array.
pub const BOOKMARKS_KEY: &str = "luxemarks_bookmarks";

/// Storage key holding the search API credential.
pub const API_KEY_KEY: &str = "serp_api_key";

/// Local storage view over a database connection.
pub struct LocalStorage<'a> {
    conn: &'a Connection,
}

impl<'a> LocalStorage<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Self::now()],
        )?;
        Ok(())
    }

    /// Removes a key. Missing keys are not an error.
    pub fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Loads the persisted bookmark list (empty when nothing was saved).
    ///
    /// Records saved mid-lookup come back with `loading` cleared.
    pub fn load_bookmarks(&self) -> Result<Vec<Bookmark>, StorageError> {
        let Some(raw) = self.get_item(BOOKMARKS_KEY)? else {
            return Ok(Vec::new());
        };
        let mut bookmarks: Vec<Bookmark> = serde_json::from_str(&raw)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        for bookmark in bookmarks.iter_mut().filter(|b| b.loading) {
            debug!(id = %bookmark.id, "Clearing stale loading flag");
            bookmark.loading = false;
        }
        Ok(bookmarks)
    }

    pub fn save_bookmarks(&self, bookmarks: &[Bookmark]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(bookmarks)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        self.set_item(BOOKMARKS_KEY, &raw)
    }

    pub fn load_api_key(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .get_item(API_KEY_KEY)?
            .filter(|key| !key.trim().is_empty()))
    }

    pub fn save_api_key(&self, key: &str) -> Result<(), StorageError> {
        self.set_item(API_KEY_KEY, key)
    }

    pub fn clear_api_key(&self) -> Result<(), StorageError> {
        self.remove_item(API_KEY_KEY)
    }
}
