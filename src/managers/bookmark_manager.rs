//! Bookmark collection for LuxeMarks.
//!
//! Implements `BookmarkManagerTrait` over an in-memory list kept newest
//! first. Persistence is the caller's job (see `LocalStorage`).

use chrono::Utc;
use uuid::Uuid;

use crate::types::bookmark::Bookmark;
use crate::types::errors::BookmarkError;

/// Display fields for a bookmark that is still being looked up.
#[derive(Debug, Clone, Copy)]
pub struct Placeholder<'a> {
    pub title: &'a str,
    pub price: &'a str,
    pub store: &'a str,
}

/// Trait defining bookmark collection operations.
pub trait BookmarkManagerTrait {
    /// Inserts a loading bookmark for `url` at the front. Returns its ID.
    fn insert_placeholder(&mut self, url: &str, placeholder: Placeholder<'_>) -> String;
    fn add_bookmark(&mut self, bookmark: Bookmark) -> Result<(), BookmarkError>;
    /// Prepends `bookmarks`, keeping their relative order.
    fn prepend_all(&mut self, bookmarks: Vec<Bookmark>) -> Result<usize, BookmarkError>;
    /// Fills in looked-up details and clears the loading flag.
    ///
    /// `price` of `None` keeps the current price.
    fn apply_details(&mut self, id: &str, title: &str, price: Option<&str>, store: &str) -> Result<(), BookmarkError>;
    /// Marks a failed lookup: the URL becomes the title and the price reads "Error".
    fn mark_failed(&mut self, id: &str) -> Result<(), BookmarkError>;
    /// Replaces the bookmark with the same ID.
    fn update_bookmark(&mut self, bookmark: Bookmark) -> Result<(), BookmarkError>;
    fn remove_bookmark(&mut self, id: &str) -> Result<Bookmark, BookmarkError>;
    fn get_bookmark(&self, id: &str) -> Option<&Bookmark>;
    fn list_bookmarks(&self) -> &[Bookmark];
    fn bookmark_count(&self) -> usize;
}

/// Store label given to bookmarks whose lookup failed.
pub const FAILED_STORE: &str = "Link";
/// Price shown on bookmarks whose lookup failed.
pub const FAILED_PRICE: &str = "Error";

/// In-memory bookmark list, newest first.
#[derive(Debug, Clone, Default)]
pub struct BookmarkManager {
    bookmarks: Vec<Bookmark>,
}

impl BookmarkManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a previously stored list, keeping its order.
    pub fn from_bookmarks(bookmarks: Vec<Bookmark>) -> Self {
        Self { bookmarks }
    }

    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    fn find_index(&self, id: &str) -> Option<usize> {
        self.bookmarks.iter().position(|b| b.id == id)
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Bookmark, BookmarkError> {
        self.bookmarks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| BookmarkError::NotFound(id.to_string()))
    }
}

impl BookmarkManagerTrait for BookmarkManager {
    fn insert_placeholder(&mut self, url: &str, placeholder: Placeholder<'_>) -> String {
        let id = Uuid::new_v4().to_string();
        self.bookmarks.insert(
            0,
            Bookmark {
                id: id.clone(),
                url: url.to_string(),
                title: placeholder.title.to_string(),
                price: placeholder.price.to_string(),
                store: placeholder.store.to_string(),
                timestamp: Self::now(),
                loading: true,
            },
        );
        id
    }

    fn add_bookmark(&mut self, bookmark: Bookmark) -> Result<(), BookmarkError> {
        if self.find_index(&bookmark.id).is_some() {
            return Err(BookmarkError::DuplicateId(bookmark.id));
        }
        self.bookmarks.insert(0, bookmark);
        Ok(())
    }

    fn prepend_all(&mut self, bookmarks: Vec<Bookmark>) -> Result<usize, BookmarkError> {
        for (i, b) in bookmarks.iter().enumerate() {
            if self.find_index(&b.id).is_some() || bookmarks[..i].iter().any(|o| o.id == b.id) {
                return Err(BookmarkError::DuplicateId(b.id.clone()));
            }
        }
        let count = bookmarks.len();
        self.bookmarks.splice(0..0, bookmarks);
        Ok(count)
    }

    fn apply_details(&mut self, id: &str, title: &str, price: Option<&str>, store: &str) -> Result<(), BookmarkError> {
        let bookmark = self.find_mut(id)?;
        bookmark.title = title.to_string();
        if let Some(price) = price {
            bookmark.price = price.to_string();
        }
        bookmark.store = store.to_string();
        bookmark.loading = false;
        Ok(())
    }

    fn mark_failed(&mut self, id: &str) -> Result<(), BookmarkError> {
        let bookmark = self.find_mut(id)?;
        bookmark.title = bookmark.url.clone();
        bookmark.store = FAILED_STORE.to_string();
        bookmark.price = FAILED_PRICE.to_string();
        bookmark.loading = false;
        Ok(())
    }

    fn update_bookmark(&mut self, bookmark: Bookmark) -> Result<(), BookmarkError> {
        let slot = self.find_mut(&bookmark.id)?;
        *slot = bookmark;
        Ok(())
    }

    fn remove_bookmark(&mut self, id: &str) -> Result<Bookmark, BookmarkError> {
        let index = self
            .find_index(id)
            .ok_or_else(|| BookmarkError::NotFound(id.to_string()))?;
        Ok(self.bookmarks.remove(index))
    }

    fn get_bookmark(&self, id: &str) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.id == id)
    }

    fn list_bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    fn bookmark_count(&self) -> usize {
        self.bookmarks.len()
    }
}
