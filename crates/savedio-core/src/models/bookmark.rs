//! Bookmark model

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

use super::SortOrder;

/// `chrono` format of [`Bookmark::date`], e.g. `2017-03-02 13:08:41`.
///
/// The format is fixed width and zero padded, so string order matches
/// chronological order.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Identifier of a bookmark.
///
/// Server ids are opaque strings; bookmarks created while offline get a
/// UUID v7 string instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkId(String);

impl BookmarkId {
    /// Wrap an id assigned by the remote API
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a local id for a bookmark that never reached the server
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookmarkId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BookmarkId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A saved URL with its metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Unique identifier
    pub id: BookmarkId,
    /// Target URL (required)
    pub url: String,
    /// Display title
    pub title: String,
    /// Free-form notes
    pub notes: String,
    /// Creation date formatted with [`DATE_FORMAT`]
    pub date: String,
    /// Name of the list this bookmark belongs to, empty for none
    pub list_name: String,
    /// Favorite flag
    pub is_favorite: bool,
    /// Number of times the bookmark was opened
    pub click_counter: i64,
}

impl Bookmark {
    /// Create a bookmark stamped with a fresh local id and the current date
    #[must_use]
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: BookmarkId::generate(),
            url: url.into(),
            title: title.into(),
            notes: String::new(),
            date: format_date(&Local::now()),
            list_name: String::new(),
            is_favorite: false,
            click_counter: 0,
        }
    }

    /// Whether the bookmark is a member of a list
    #[must_use]
    pub fn has_list(&self) -> bool {
        !self.list_name.is_empty()
    }

    /// Register one more click on this bookmark
    pub fn increment_click_counter(&mut self) {
        self.click_counter = self.click_counter.saturating_add(1);
    }
}

/// Format a timestamp the way bookmark dates are stored
#[must_use]
pub fn format_date(date_time: &DateTime<Local>) -> String {
    date_time.format(DATE_FORMAT).to_string()
}

/// Compare two bookmarks according to the given sort order.
///
/// Date and title orders put favorites first; click order is descending.
#[must_use]
pub fn compare_bookmarks(a: &Bookmark, b: &Bookmark, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Clicks => b.click_counter.cmp(&a.click_counter),
        SortOrder::Date => favorites_first(a, b).then_with(|| a.date.cmp(&b.date)),
        SortOrder::Title => favorites_first(a, b).then_with(|| a.title.cmp(&b.title)),
    }
}

/// Sort bookmarks in place (stable)
pub fn sort_bookmarks(bookmarks: &mut [Bookmark], order: SortOrder) {
    bookmarks.sort_by(|a, b| compare_bookmarks(a, b, order));
}

fn favorites_first(a: &Bookmark, b: &Bookmark) -> Ordering {
    b.is_favorite.cmp(&a.is_favorite)
}
