//! savedio-core - Core library for Saved.io++
//!
//! This crate contains the bookmark models, the libSQL database layer, the
//! saved.io API client and the reconciliation routine that keeps the local
//! store aligned with the remote bookmark collection.

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod favorites;
pub mod models;
pub mod services;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{Bookmark, BookmarkId, BookmarkList, SyncResult};
