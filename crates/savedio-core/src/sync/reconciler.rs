//! Remote to local bookmark reconciliation.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use tokio_util::sync::CancellationToken;

use super::report::{ListChangeNotification, SyncReporter};
use super::{
    RemoteBookmark, RemoteBookmarkSource, SyncError, SyncErrorCategory, DEFAULT_PAGE_SIZE,
};
use crate::db::{
    BookmarkFilter, BookmarkRepository, BookmarkStore, SettingsRepository, StoreTransaction,
};
use crate::models::{BookmarkId, SyncResult};
use crate::util::unix_millis_now;

/// Number of bookmarks removed, created and updated by a reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub removed: usize,
    pub created: usize,
    pub updated: usize,
}

impl SyncSummary {
    /// Whether the reconciliation changed nothing
    pub const fn is_empty(&self) -> bool {
        self.removed == 0 && self.created == 0 && self.updated == 0
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} removed, {} created, {} updated",
            self.removed, self.created, self.updated
        )
    }
}

/// Result of a committed reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub summary: SyncSummary,
    /// Notify-enabled lists that gained created or updated bookmarks
    pub notified_lists: Vec<String>,
}

/// Why a reconciliation was abandoned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    pub category: SyncErrorCategory,
    pub message: String,
}

/// How a reconciliation attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No user key; nothing was fetched or written
    Offline,
    /// Cancelled before the local transaction started; nothing was written
    Cancelled,
    /// Changes were committed
    Completed(SyncReport),
    /// Aborted without applying changes; the failure was recorded
    Failed(SyncFailure),
}

impl SyncOutcome {
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Aligns the local store with the remote bookmark collection.
pub struct Reconciler<R, S, P> {
    remote: R,
    store: S,
    reporter: P,
    page_size: u32,
}

impl<R, S, P> Reconciler<R, S, P>
where
    R: RemoteBookmarkSource,
    S: BookmarkStore,
    P: SyncReporter,
{
    pub const fn new(remote: R, store: S, reporter: P) -> Self {
        Self {
            remote,
            store,
            reporter,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the number of records requested per page
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub const fn remote(&self) -> &R {
        &self.remote
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Run one reconciliation.
    ///
    /// Never fails: errors are recorded in the sync result and reported
    /// through the returned outcome. Cancellation is honored until the local
    /// transaction begins.
    pub async fn reconcile(&self, cancel: &CancellationToken) -> SyncOutcome {
        if !self.remote.has_credentials() {
            tracing::info!("No user key configured, skipping synchronization");
            return SyncOutcome::Offline;
        }

        tracing::info!("Starting bookmarks synchronization");
        match self.try_reconcile(cancel).await {
            Ok(report) => {
                tracing::info!("Bookmarks synchronization finished: {}", report.summary);
                SyncOutcome::Completed(report)
            }
            Err(SyncError::Cancelled) => {
                tracing::info!("Bookmarks synchronization cancelled");
                SyncOutcome::Cancelled
            }
            Err(error) => {
                tracing::warn!("Bookmarks synchronization failed: {error}");
                let failure = SyncFailure {
                    category: error.category(),
                    message: error.to_string(),
                };
                self.record_failure(&failure.message).await;
                SyncOutcome::Failed(failure)
            }
        }
    }

    async fn try_reconcile(&self, cancel: &CancellationToken) -> Result<SyncReport, SyncError> {
        let remote = self.fetch_all_pages(cancel).await?;
        if cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }

        let tx = self.store.begin().await?;
        let (summary, notify) = match apply_changes(&tx, &remote).await {
            Ok(applied) => applied,
            Err(error) => {
                if let Err(rollback_error) = tx.rollback().await {
                    tracing::warn!("Rollback failed: {rollback_error}");
                }
                return Err(error);
            }
        };
        tx.commit().await?;

        if let Err(error) = self.record_last_sync(unix_millis_now()).await {
            tracing::warn!("Failed to store last sync time: {error}");
        }

        let notified_lists = match ListChangeNotification::new(notify) {
            Some(notification) => {
                self.reporter.lists_changed(&notification);
                notification.lists
            }
            None => Vec::new(),
        };

        Ok(SyncReport {
            summary,
            notified_lists,
        })
    }

    /// Page through the remote collection.
    ///
    /// The API never answers with an empty page past the end: it repeats the
    /// final page, so paging stops when the last id repeats.
    async fn fetch_all_pages(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<RemoteBookmark>, SyncError> {
        let mut records = Vec::new();
        let mut seen = HashSet::new();
        let mut last_id: Option<String> = None;
        let mut page = 1;

        loop {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled);
            }

            let batch = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(SyncError::Cancelled),
                result = self.remote.fetch_page(page, self.page_size) => result?,
            };

            let Some(newest_last) = batch.last().map(|record| record.id.clone()) else {
                break;
            };
            if last_id.as_deref() == Some(newest_last.as_str()) {
                break;
            }
            tracing::debug!(page, size = batch.len(), "Fetched bookmarks page");

            for record in batch {
                if seen.insert(record.id.clone()) {
                    records.push(record);
                }
            }
            last_id = Some(newest_last);
            page += 1;
        }

        Ok(records)
    }

    async fn record_last_sync(&self, millis: i64) -> crate::Result<()> {
        let tx = self.store.begin().await?;
        tx.settings().set_last_sync_time(millis).await?;
        tx.commit().await
    }

    async fn record_failure(&self, message: &str) {
        let result = async {
            let tx = self.store.begin().await?;
            tx.settings()
                .save_sync_result(&SyncResult::failed(message))
                .await?;
            tx.commit().await
        }
        .await;

        if let Err(error) = result {
            tracing::warn!("Failed to store sync result: {error}");
        }
    }
}

/// Apply the remote state inside `tx` and select the lists to notify.
async fn apply_changes<T: StoreTransaction>(
    tx: &T,
    remote: &[RemoteBookmark],
) -> Result<(SyncSummary, BTreeSet<String>), SyncError> {
    let repo = tx.bookmarks();
    let mut summary = SyncSummary::default();

    let local = repo.find_all(&BookmarkFilter::All).await?;
    let remote_ids: HashSet<&str> = remote.iter().map(|record| record.id.as_str()).collect();
    for bookmark in &local {
        if !remote_ids.contains(bookmark.id.as_str()) {
            repo.delete(&bookmark.id).await?;
            summary.removed += 1;
        }
    }

    let local_by_id: HashMap<&str, &crate::Bookmark> = local
        .iter()
        .map(|bookmark| (bookmark.id.as_str(), bookmark))
        .collect();
    let mut changed: HashSet<BookmarkId> = HashSet::new();

    for record in remote {
        match local_by_id.get(record.id.as_str()) {
            None => {
                let bookmark = record.to_bookmark();
                if bookmark.has_list() {
                    repo.upsert_list(&bookmark.list_name).await?;
                }
                repo.upsert(&bookmark).await?;
                changed.insert(bookmark.id);
                summary.created += 1;
            }
            Some(existing) if record.differs_from(existing) => {
                let mut bookmark = (*existing).clone();
                record.apply_to(&mut bookmark);
                repo.upsert(&bookmark).await?;
                changed.insert(bookmark.id);
                summary.updated += 1;
            }
            Some(_) => {}
        }
    }

    let mut notify = BTreeSet::new();
    for list in repo.find_lists().await? {
        if list.is_empty() {
            repo.delete_list(&list.name).await?;
            tracing::debug!("Removed empty list {}", list.name);
        } else if list.notify && list.bookmarks.iter().any(|id| changed.contains(id)) {
            notify.insert(list.name);
        }
    }

    tx.settings()
        .save_sync_result(&SyncResult::succeeded(summary.to_string()))
        .await?;

    Ok((summary, notify))
}
