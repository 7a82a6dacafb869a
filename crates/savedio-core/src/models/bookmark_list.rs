//! Bookmark list model

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::BookmarkId;
use crate::error::{Error, Result};

static LIST_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+$").expect("Invalid regex"));

/// A named grouping of bookmarks.
///
/// Lists only reference their members; deleting a list never deletes
/// bookmarks, and a list without members is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkList {
    /// Unique, case-sensitive list name
    pub name: String,
    /// Whether synchronization should notify when members are created or updated
    pub notify: bool,
    /// Member ids in insertion order
    pub bookmarks: Vec<BookmarkId>,
}

impl BookmarkList {
    /// Create an empty list with notifications disabled
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            notify: false,
            bookmarks: Vec::new(),
        }
    }

    /// Whether the list has no members
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }
}

/// Normalize a user-typed list name.
///
/// The name is trimmed and lowercased, and must then contain only `a-z` and
/// `0-9`. Names coming from the remote API are stored as-is and never go
/// through this check.
pub fn normalize_list_name(raw: &str) -> Result<String> {
    let name = raw.trim().to_lowercase();
    if name.is_empty() {
        return Err(Error::InvalidInput(
            "List name must not be empty".to_string(),
        ));
    }
    if !LIST_NAME_PATTERN.is_match(&name) {
        return Err(Error::InvalidInput(
            "List name must contain only alphabetic (a-z) and numeric (0-9) characters"
                .to_string(),
        ));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_list_name_lowercases() {
        assert_eq!(normalize_list_name(" Work42 ").unwrap(), "work42");
    }

    #[test]
    fn test_normalize_list_name_rejects_empty() {
        assert!(normalize_list_name("   ").is_err());
    }

    #[test]
    fn test_normalize_list_name_rejects_symbols() {
        assert!(normalize_list_name("my-list").is_err());
        assert!(normalize_list_name("read later").is_err());
        assert!(normalize_list_name("caf\u{e9}").is_err());
    }

    #[test]
    fn test_list_membership() {
        let mut list = BookmarkList::new("work");
        assert!(list.is_empty());

        list.bookmarks.push(BookmarkId::from("a"));
        assert!(!list.is_empty());
    }
}
