//! Shared database service wrapper used across clients.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::db::{
    purge_list_if_empty, BookmarkFilter, BookmarkRepository, BookmarkStore, Database,
    LibSqlBookmarkRepository, LibSqlSettingsRepository, LibSqlTransaction, SettingsRepository,
    StoreTransaction,
};
use crate::favorites::{promote_on_click, select_smart_favorites, Promotion};
use crate::models::{Bookmark, BookmarkList, Settings, SortOrder, SyncResult};
use crate::{BookmarkId, Error, Result};

/// Thread-safe service for DB and repository operations.
///
/// Every write runs in its own transaction; a transaction keeps the database
/// locked until it is committed or rolled back.
#[derive(Clone)]
pub struct DatabaseService {
    db: Arc<Mutex<Database>>,
    db_path: Option<PathBuf>,
}

impl DatabaseService {
    /// Open a database service at the given filesystem path.
    pub async fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&db_path).await?;
        tracing::debug!("Opened bookmark database at {}", db_path.display());
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: Some(db_path),
        })
    }

    /// Open an in-memory database service (primarily for tests).
    pub async fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory().await?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: None,
        })
    }

    /// Filesystem location of the database, `None` for in-memory databases.
    pub fn db_path(&self) -> Option<&PathBuf> {
        self.db_path.as_ref()
    }

    /// List bookmarks matching a filter in the requested order.
    pub async fn list_bookmarks(
        &self,
        filter: &BookmarkFilter,
        order: SortOrder,
    ) -> Result<Vec<Bookmark>> {
        let db = self.db.lock().await;
        let repo = LibSqlBookmarkRepository::new(db.connection());
        let mut bookmarks = repo.find_all(filter).await?;
        crate::models::sort_bookmarks(&mut bookmarks, order);
        Ok(bookmarks)
    }

    /// Fetch a bookmark by id.
    pub async fn get_bookmark(&self, id: &BookmarkId) -> Result<Option<Bookmark>> {
        let db = self.db.lock().await;
        let repo = LibSqlBookmarkRepository::new(db.connection());
        repo.find_by_id(id).await
    }

    /// Store a bookmark, creating its list first when needed.
    pub async fn add_bookmark(&self, bookmark: &Bookmark) -> Result<()> {
        let tx = self.begin().await?;
        let result = Self::insert_with_list(&tx, bookmark).await;
        finish(tx, result).await
    }

    /// Delete a bookmark and its list when the list becomes empty.
    ///
    /// Returns the deleted bookmark.
    pub async fn remove_bookmark(&self, id: &BookmarkId) -> Result<Bookmark> {
        let tx = self.begin().await?;
        let result = Self::delete_with_list_purge(&tx, id).await;
        finish(tx, result).await
    }

    /// List every bookmark list with its members.
    pub async fn lists(&self) -> Result<Vec<BookmarkList>> {
        let db = self.db.lock().await;
        let repo = LibSqlBookmarkRepository::new(db.connection());
        repo.find_lists().await
    }

    /// List the names of all bookmark lists.
    pub async fn list_names(&self) -> Result<Vec<String>> {
        Ok(self
            .lists()
            .await?
            .into_iter()
            .map(|list| list.name)
            .collect())
    }

    /// Enable or disable sync notifications for a list.
    pub async fn set_list_notify(&self, name: &str, notify: bool) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlBookmarkRepository::new(db.connection());
        if repo.set_list_notify(name, notify).await? {
            Ok(())
        } else {
            Err(Error::NotFound(format!("list {name}")))
        }
    }

    /// Set or unset the favorite flag of a bookmark.
    pub async fn set_favorite(&self, id: &BookmarkId, is_favorite: bool) -> Result<Bookmark> {
        let tx = self.begin().await?;
        let result = async {
            let repo = tx.bookmarks();
            let mut bookmark = find_existing(&repo, id).await?;
            bookmark.is_favorite = is_favorite;
            repo.upsert(&bookmark).await?;
            Ok::<_, Error>(bookmark)
        }
        .await;
        finish(tx, result).await
    }

    /// Unset the favorite flag of every bookmark, returning how many changed.
    pub async fn clear_favorites(&self) -> Result<usize> {
        let tx = self.begin().await?;
        let result = async {
            let repo = tx.bookmarks();
            let favorites = repo.find_all(&BookmarkFilter::Favorites).await?;
            for mut bookmark in favorites.iter().cloned() {
                bookmark.is_favorite = false;
                repo.upsert(&bookmark).await?;
            }
            Ok::<_, Error>(favorites.len())
        }
        .await;
        finish(tx, result).await
    }

    /// Flag the most clicked bookmarks as favorites, returning how many were selected.
    pub async fn mark_smart_favorites(&self) -> Result<usize> {
        let tx = self.begin().await?;
        let result = async {
            let repo = tx.bookmarks();
            let clicked = repo.find_all(&BookmarkFilter::Clicked).await?;
            let selected = select_smart_favorites(&clicked);
            for mut bookmark in clicked {
                if selected.contains(&bookmark.id) && !bookmark.is_favorite {
                    bookmark.is_favorite = true;
                    repo.upsert(&bookmark).await?;
                }
            }
            Ok::<_, Error>(selected.len())
        }
        .await;
        finish(tx, result).await
    }

    /// Count one more click on a bookmark.
    ///
    /// With smart favorites enabled, the bookmark may be promoted to favorite.
    pub async fn record_click(&self, id: &BookmarkId) -> Result<Bookmark> {
        let tx = self.begin().await?;
        let result = async {
            let repo = tx.bookmarks();
            let mut bookmark = find_existing(&repo, id).await?;
            bookmark.increment_click_counter();

            if tx.settings().load().await?.smart_favorites {
                let favorites = repo.find_all(&BookmarkFilter::Favorites).await?;
                match promote_on_click(&bookmark, &favorites) {
                    Promotion::Skip => {}
                    Promotion::Add => bookmark.is_favorite = true,
                    Promotion::Swap(demoted) => {
                        if let Some(mut previous) = favorites.into_iter().find(|f| f.id == demoted)
                        {
                            previous.is_favorite = false;
                            repo.upsert(&previous).await?;
                        }
                        bookmark.is_favorite = true;
                    }
                }
            }

            repo.upsert(&bookmark).await?;
            Ok::<_, Error>(bookmark)
        }
        .await;
        finish(tx, result).await
    }

    /// Load settings.
    pub async fn load_settings(&self) -> Result<Settings> {
        let db = self.db.lock().await;
        let repo = LibSqlSettingsRepository::new(db.connection());
        repo.load().await
    }

    /// Save settings.
    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlSettingsRepository::new(db.connection());
        repo.save(settings).await
    }

    /// Time of the last successful reconciliation (Unix ms), 0 when never synced.
    pub async fn last_sync_time(&self) -> Result<i64> {
        let db = self.db.lock().await;
        let repo = LibSqlSettingsRepository::new(db.connection());
        repo.last_sync_time().await
    }

    /// Outcome of the most recent reconciliation attempt.
    pub async fn sync_result(&self) -> Result<Option<SyncResult>> {
        let db = self.db.lock().await;
        let repo = LibSqlSettingsRepository::new(db.connection());
        repo.load_sync_result().await
    }

    async fn insert_with_list(tx: &LibSqlTransaction, bookmark: &Bookmark) -> Result<()> {
        let repo = tx.bookmarks();
        if bookmark.has_list() {
            repo.upsert_list(&bookmark.list_name).await?;
        }
        repo.upsert(bookmark).await
    }

    async fn delete_with_list_purge(tx: &LibSqlTransaction, id: &BookmarkId) -> Result<Bookmark> {
        let repo = tx.bookmarks();
        let bookmark = find_existing(&repo, id).await?;
        repo.delete(id).await?;
        if bookmark.has_list() && purge_list_if_empty(&repo, &bookmark.list_name).await? {
            tracing::debug!("Removed empty list {}", bookmark.list_name);
        }
        Ok(bookmark)
    }
}

impl BookmarkStore for DatabaseService {
    type Transaction = LibSqlTransaction;

    async fn begin(&self) -> Result<LibSqlTransaction> {
        let guard = Arc::clone(&self.db).lock_owned().await;
        LibSqlTransaction::begin(guard).await
    }
}

async fn find_existing(repo: &impl BookmarkRepository, id: &BookmarkId) -> Result<Bookmark> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("bookmark {id}")))
}

/// Commit on success, roll back on failure.
async fn finish<T>(tx: LibSqlTransaction, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback_error) = tx.rollback().await {
                tracing::warn!("Rollback failed: {rollback_error}");
            }
            Err(error)
        }
    }
}
