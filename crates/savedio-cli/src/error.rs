use std::io;

use savedio_core::sync::{SyncError, SyncErrorCategory};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] savedio_core::Error),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Bookmark ID cannot be empty")]
    EmptyBookmarkId,
    #[error("User key cannot be empty")]
    EmptyUserKey,
    #[error("Bookmark not found for id/prefix: {0}")]
    BookmarkNotFound(String),
    #[error("{0}")]
    AmbiguousBookmarkId(String),
    #[error("List name cannot be empty")]
    EmptyListName,
    #[error("List not found: {0}")]
    ListNotFound(String),
    #[error(
        "Sync needs a saved.io user key. Run `savedio config set-key <KEY>` or set SAVEDIO_USER_KEY."
    )]
    SyncNotConfigured,
    #[error("Sync failed ({category}): {message}")]
    SyncFailed {
        category: SyncErrorCategory,
        message: String,
    },
    #[error("Sync was cancelled")]
    SyncCancelled,
}
