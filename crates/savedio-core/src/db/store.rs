//! Transactional access to the bookmark store

use libsql::Transaction;
use tokio::sync::OwnedMutexGuard;

use super::{
    BookmarkRepository, Database, LibSqlBookmarkRepository, LibSqlSettingsRepository,
    SettingsRepository,
};
use crate::error::Result;

/// A unit of work against the store.
///
/// Changes become visible only after [`commit`](Self::commit); dropping a
/// transaction without committing discards them.
#[allow(async_fn_in_trait)]
pub trait StoreTransaction: Sized {
    /// Bookmark and list operations inside this transaction
    fn bookmarks(&self) -> impl BookmarkRepository + '_;

    /// Settings and sync bookkeeping inside this transaction
    fn settings(&self) -> impl SettingsRepository + '_;

    /// Make every change of this transaction visible
    async fn commit(self) -> Result<()>;

    /// Discard every change of this transaction
    async fn rollback(self) -> Result<()>;
}

/// A store that hands out exclusive transactions
#[allow(async_fn_in_trait)]
pub trait BookmarkStore {
    /// Transaction type
    type Transaction: StoreTransaction;

    /// Start a transaction, waiting for any other writer to finish
    async fn begin(&self) -> Result<Self::Transaction>;

    /// Read the last successful reconciliation time (Unix ms)
    async fn read_last_sync_time(&self) -> Result<i64> {
        let tx = self.begin().await?;
        let last_sync = tx.settings().last_sync_time().await;
        tx.rollback().await?;
        last_sync
    }
}

/// libSQL transaction holding exclusive access to the database
pub struct LibSqlTransaction {
    // Dropped before the guard
    tx: Transaction,
    _guard: OwnedMutexGuard<Database>,
}

impl LibSqlTransaction {
    /// Begin a transaction on a locked database
    pub async fn begin(guard: OwnedMutexGuard<Database>) -> Result<Self> {
        let tx = guard.connection().transaction().await?;
        Ok(Self { tx, _guard: guard })
    }
}

impl StoreTransaction for LibSqlTransaction {
    fn bookmarks(&self) -> impl BookmarkRepository + '_ {
        LibSqlBookmarkRepository::new(&self.tx)
    }

    fn settings(&self) -> impl SettingsRepository + '_ {
        LibSqlSettingsRepository::new(&self.tx)
    }

    async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
